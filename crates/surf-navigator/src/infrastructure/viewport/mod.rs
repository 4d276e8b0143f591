//! Viewport source infrastructure.
//!
//! A window system reports its size whenever it changes.  The navigator host
//! does not care where those reports come from: a [`ViewportSource`] hands
//! out a channel receiver, and the application layer's viewport pump drains
//! it in arrival order.
//!
//! # Testability
//!
//! [`manual::ManualViewportSource`] lets tests and the console binary emit
//! viewport sizes by hand.

use tokio::sync::mpsc;

use crate::application::layout_bridge::Viewport;

pub mod manual;

/// Error type for viewport source operations.
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error("viewport source has already been started")]
    AlreadyStarted,
    #[error("viewport source is not running")]
    NotRunning,
    #[error("viewport receiver has been dropped")]
    ReceiverDropped,
}

/// Trait abstracting viewport change notifications.
pub trait ViewportSource: Send {
    /// Starts the source and returns a receiver for viewport changes.
    fn start(&self) -> Result<mpsc::UnboundedReceiver<Viewport>, ViewportError>;
    /// Stops the source; the receiver drains and then closes.
    fn stop(&self);
}
