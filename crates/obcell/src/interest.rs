#![forbid(unsafe_code)]

//! Interest flags: which notification waves a subscription wants.

use bitflags::bitflags;

bitflags! {
    /// Option set selecting when a subscription's callback fires.
    ///
    /// A subscription registers a union of these flags. During delivery the
    /// callback receives the wave it is being invoked for as its second
    /// argument; that value always has exactly one bit set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Interest: u8 {
        /// Fire once, synchronously, inside `subscribe`, with the value
        /// present at subscription time.
        const INITIAL = 1 << 0;
        /// Fire with the pre-change value, before the container swaps it out.
        const OLD = 1 << 1;
        /// Fire with the post-change value, after the container swaps it in.
        const NEW = 1 << 2;
    }
}

impl Default for Interest {
    /// `NEW` only: the common "tell me the fresh value" subscription.
    fn default() -> Self {
        Interest::NEW
    }
}
