#![forbid(unsafe_code)]

//! Observable value container with interest-flagged change notification.
//!
//! # Role
//!
//! `obcell` provides one primitive: [`ObservableValue<T>`], a value holder
//! that synchronously notifies registered callbacks whenever the value is
//! mutated. Observers are tracked by weak identity ([`ObserverId`]), so the
//! container never keeps an observer alive; entries for dead observers are
//! pruned lazily on the next mutation.
//!
//! # Primary responsibilities
//!
//! - **[`ObservableValue`]**: single-writer, multi-reader change notification
//!   with ordered delivery.
//! - **[`ObserverId`]**: opaque, non-owning observer identity used to find,
//!   remove, and liveness-test subscriptions.
//! - **[`Interest`]**: option set selecting which notification waves a
//!   subscription receives (`INITIAL`, `OLD`, `NEW`).
//!
//! # Invariants
//!
//! 1. Callbacks fire in subscription insertion order.
//! 2. `INITIAL` interest fires exactly once, synchronously, inside
//!    `subscribe`, with the value present at subscription time.
//! 3. `OLD` callbacks observe the pre-change value; `NEW` callbacks the
//!    post-change value. The value is swapped between the two waves.
//! 4. Every `set`/`update` notifies, even when the new value compares equal
//!    to the old one. There is no equality dedup.
//! 5. The container holds only a `Weak` handle to each observer identity and
//!    never extends an observer's lifetime.
//!
//! # Threading
//!
//! Single-threaded by construction (`Rc<RefCell<..>>` interior). Callers that
//! share a container across threads must serialize access themselves; this is
//! explicitly not a thread-safe primitive.

pub mod interest;
pub mod observable;
pub mod observer;

pub use interest::Interest;
pub use observable::{ObservableValue, Registration};
pub use observer::ObserverId;
