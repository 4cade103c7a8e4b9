#![forbid(unsafe_code)]

//! Weak observer identity tokens.
//!
//! An [`ObserverId`] stands in for "the object that subscribed" without
//! owning it. The container uses it for exactly two things: finding and
//! removing subscriptions (allocation-pointer equality) and testing liveness
//! (strong count of the owning `Rc`). Because the handle is a `Weak`, holding
//! any number of `ObserverId`s never delays the observer's deallocation.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

/// Opaque, non-owning identity of an observing object.
///
/// Build one from any caller-owned `Rc` with [`ObserverId::of`]. Two ids are
/// the same observer iff they were built from `Rc`s sharing one allocation.
#[derive(Clone)]
pub struct ObserverId {
    handle: Weak<dyn Any>,
}

impl ObserverId {
    /// Identity of `owner`. Allocates nothing; clones only a `Weak`.
    #[must_use]
    pub fn of<O: Any>(owner: &Rc<O>) -> Self {
        let erased: Rc<dyn Any> = Rc::<O>::clone(owner);
        Self {
            handle: Rc::downgrade(&erased),
        }
    }

    /// Whether the owning `Rc` allocation still has strong references.
    ///
    /// Subscriptions whose id reports `false` are removed on the next
    /// mutation of the observed value.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.handle.strong_count() > 0
    }

    /// Whether `self` and `other` identify the same observer allocation.
    ///
    /// Pointer identity, not value equality; remains stable after the
    /// observer is dropped.
    #[must_use]
    pub fn same_observer(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.handle, &other.handle)
    }
}

impl PartialEq for ObserverId {
    fn eq(&self, other: &Self) -> bool {
        self.same_observer(other)
    }
}

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverId")
            .field("alive", &self.is_alive())
            .finish()
    }
}
