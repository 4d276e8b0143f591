//! Monotonic counter deriving overlay stacking order.
//!
//! Every time an overlay is brought to the front it receives the next value
//! of its router's counter, so the most recently shown overlay always holds
//! the largest order and no two overlays ever share one.
//!
//! The counter is process-lifetime state owned by one router instance.  It is
//! never serialized: after a restore, overlays start hidden (order 0) and any
//! value the counter hands out is larger than every order in the state.
//!
//! # Thread safety
//!
//! The counter uses `AtomicU64` so routers can bump it through `&self` while
//! remaining pure functions of `(state, action)` from the caller's point of
//! view.  Dispatch to one router is serialized by its navigator, so
//! `Ordering::Relaxed` is enough.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.  The first call to [`next`] returns 1
/// because order 0 is reserved for "hidden".
///
/// [`next`]: OrderCounter::next
///
/// # Examples
///
/// ```rust
/// use surf_core::protocol::OrderCounter;
///
/// let counter = OrderCounter::new();
/// assert_eq!(counter.next(), 1);
/// assert_eq!(counter.next(), 2);
/// ```
#[derive(Debug, Default)]
pub struct OrderCounter {
    inner: AtomicU64,
}

impl OrderCounter {
    /// Creates a new counter; nothing has been ordered yet.
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(0),
        }
    }

    /// Increments the counter and returns the new value.
    pub fn next(&self) -> u64 {
        self.inner.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns the most recently issued order (0 if none).
    pub fn current(&self) -> u64 {
        self.inner.load(Ordering::Relaxed)
    }
}
