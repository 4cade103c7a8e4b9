#![forbid(unsafe_code)]

//! Observable value container with ordered, interest-filtered delivery.
//!
//! # Design
//!
//! [`ObservableValue<T>`] wraps a value of type `T` in shared, reference-
//! counted storage (`Rc<RefCell<..>>`). Every mutation notifies subscribers
//! in two waves: first `OLD` (pre-change value, while `get()` still returns
//! it), then `NEW` (post-change value). There is no equality dedup; setting
//! a value equal to the current one still counts as a change.
//!
//! Subscriptions are keyed by a weak [`ObserverId`]. The container owns each
//! callback but never the observer; entries whose observer has been dropped
//! are pruned at the start of the next mutation, before any wave fires.
//!
//! # Performance
//!
//! | Operation       | Complexity                  |
//! |-----------------|-----------------------------|
//! | `get()`         | O(1) + clone                |
//! | `set()`         | O(S) where S = subscriptions|
//! | `subscribe()`   | O(S) (replace scan)         |
//! | `unsubscribe()` | O(S)                        |
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: calling `set()` or `update()` from inside a
//!   callback is unsupported. The borrow is released before callbacks run,
//!   so it will not panic, but the interleaving of waves is unspecified and
//!   indicates a bug in the subscriber graph.
//! - **Callback panic**: propagates to the caller of `set()`/`update()`;
//!   later subscriptions in the wave are not notified.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::interest::Interest;
use crate::observer::ObserverId;

/// Callbacks are shared so a delivery wave can be snapshotted and invoked
/// after the interior borrow is released.
type Callback<T> = Rc<dyn Fn(&T, Interest)>;

/// How `subscribe_with` treats prior subscriptions for the same observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Remove any existing subscription for the observer first, so one
    /// logical observer has exactly one notification path.
    Replace,
    /// Keep existing subscriptions; the observer gains an additional
    /// callback with its own interest set.
    Append,
}

/// One registered observer: weak identity, interest set, owned callback.
struct Subscription<T> {
    observer: ObserverId,
    interest: Interest,
    callback: Callback<T>,
}

struct Inner<T> {
    value: T,
    version: u64,
    /// Insertion order is delivery order.
    subscriptions: Vec<Subscription<T>>,
}

/// A shared value that notifies interest-filtered subscribers on mutation.
///
/// Cloning an `ObservableValue` creates a new handle to the **same** inner
/// state: both handles see the same value, version, and subscriptions.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each `set`/`update`.
/// 2. Delivery order within a wave is subscription insertion order.
/// 3. Dead observers are pruned before either wave of a mutation fires.
/// 4. `get()` returns the pre-change value for the whole `OLD` wave and the
///    post-change value for the whole `NEW` wave.
pub struct ObservableValue<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableValue")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscription_count", &inner.subscriptions.len())
            .finish()
    }
}

impl<T: Clone + 'static> ObservableValue<T> {
    /// Create a new container with the given initial value.
    ///
    /// The initial version is 0 and no subscriptions are registered.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                subscriptions: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Current version number. Increments by 1 on every mutation, including
    /// mutations that leave the value equal to its previous state. Useful
    /// for dirty-checking in render loops.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscriptions, including entries for dead
    /// observers that have not been pruned yet.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    /// Register `callback` for `observer`, replacing any prior subscription
    /// for the same identity.
    ///
    /// If `interest` contains [`Interest::INITIAL`], the callback is invoked
    /// immediately and synchronously with `(current, INITIAL)` before this
    /// method returns. Registration always succeeds.
    pub fn subscribe(
        &self,
        observer: &ObserverId,
        interest: Interest,
        callback: impl Fn(&T, Interest) + 'static,
    ) {
        self.subscribe_with(observer, interest, Registration::Replace, callback);
    }

    /// Register `callback` for `observer` with explicit [`Registration`]
    /// control. `Registration::Append` permits several subscriptions per
    /// observer, each notified independently.
    pub fn subscribe_with(
        &self,
        observer: &ObserverId,
        interest: Interest,
        registration: Registration,
        callback: impl Fn(&T, Interest) + 'static,
    ) {
        let callback: Callback<T> = Rc::new(callback);
        {
            let mut inner = self.inner.borrow_mut();
            if registration == Registration::Replace {
                inner
                    .subscriptions
                    .retain(|s| !s.observer.same_observer(observer));
            }
            inner.subscriptions.push(Subscription {
                observer: observer.clone(),
                interest,
                callback: Rc::clone(&callback),
            });
            trace!(
                total = inner.subscriptions.len(),
                ?interest,
                "subscription added"
            );
        }
        // Outside the borrow: the callback may call back into this container.
        if interest.contains(Interest::INITIAL) {
            let current = self.inner.borrow().value.clone();
            callback(&current, Interest::INITIAL);
        }
    }

    /// Remove all subscriptions for `observer`. No-op when none exist, so
    /// double-unsubscribe and unsubscribe-of-unknown are harmless.
    pub fn unsubscribe(&self, observer: &ObserverId) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscriptions.len();
        inner
            .subscriptions
            .retain(|s| !s.observer.same_observer(observer));
        let removed = before - inner.subscriptions.len();
        if removed > 0 {
            trace!(removed, remaining = inner.subscriptions.len(), "unsubscribed");
        }
    }

    /// Replace the current value, notifying subscribers.
    ///
    /// Delivery cycle:
    /// 1. subscriptions whose observer is dead are pruned;
    /// 2. the `OLD` wave fires with the previous value, in subscription
    ///    order, while `get()` still returns that previous value;
    /// 3. the value is replaced and the version incremented;
    /// 4. the `NEW` wave fires with the new value, in subscription order.
    ///
    /// All delivery is synchronous on the caller's thread. No equality
    /// check: setting the current value again still runs the full cycle.
    pub fn set(&self, value: T) {
        let (old_wave, new_wave) = self.prune_and_snapshot();
        if !old_wave.is_empty() {
            let previous = self.inner.borrow().value.clone();
            for cb in &old_wave {
                cb(&previous, Interest::OLD);
            }
        }
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
        }
        if !new_wave.is_empty() {
            let current = self.inner.borrow().value.clone();
            for cb in &new_wave {
                cb(&current, Interest::NEW);
            }
        }
    }

    /// Mutate the value in place via a closure, running the same delivery
    /// cycle as [`set`](Self::set). The closure runs between the `OLD` and
    /// `NEW` waves; subscribers are notified unconditionally.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let (old_wave, new_wave) = self.prune_and_snapshot();
        if !old_wave.is_empty() {
            let previous = self.inner.borrow().value.clone();
            for cb in &old_wave {
                cb(&previous, Interest::OLD);
            }
        }
        {
            let mut inner = self.inner.borrow_mut();
            f(&mut inner.value);
            inner.version += 1;
        }
        if !new_wave.is_empty() {
            let current = self.inner.borrow().value.clone();
            for cb in &new_wave {
                cb(&current, Interest::NEW);
            }
        }
    }

    /// Drop dead subscriptions, then snapshot the `OLD` and `NEW` waves so
    /// callbacks run with the interior borrow released.
    fn prune_and_snapshot(&self) -> (Vec<Callback<T>>, Vec<Callback<T>>) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscriptions.len();
        inner.subscriptions.retain(|s| s.observer.is_alive());
        let pruned = before - inner.subscriptions.len();
        if pruned > 0 {
            trace!(
                pruned,
                remaining = inner.subscriptions.len(),
                "pruned dead subscriptions"
            );
        }
        let old_wave = inner
            .subscriptions
            .iter()
            .filter(|s| s.interest.contains(Interest::OLD))
            .map(|s| Rc::clone(&s.callback))
            .collect();
        let new_wave = inner
            .subscriptions
            .iter()
            .filter(|s| s.interest.contains(Interest::NEW))
            .map(|s| Rc::clone(&s.callback))
            .collect();
        (old_wave, new_wave)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
