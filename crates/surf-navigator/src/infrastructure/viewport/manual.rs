//! Hand-driven viewport source.
//!
//! Viewport sizes are pushed with [`ManualViewportSource::emit`], as if a
//! window manager had reported a resize.  The console binary feeds it from
//! `resize` commands; tests feed it directly.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::{self, UnboundedSender};

use super::{ViewportError, ViewportSource};
use crate::application::layout_bridge::Viewport;

#[derive(Debug, Clone, Default)]
pub struct ManualViewportSource {
    sender: Arc<Mutex<Option<UnboundedSender<Viewport>>>>,
}

impl ManualViewportSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self) -> MutexGuard<'_, Option<UnboundedSender<Viewport>>> {
        self.sender.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reports a new viewport size.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::NotRunning`] before `start()` or after
    /// `stop()`, and [`ViewportError::ReceiverDropped`] once the consumer is
    /// gone.
    pub fn emit(&self, viewport: Viewport) -> Result<(), ViewportError> {
        let guard = self.sender();
        let sender = guard.as_ref().ok_or(ViewportError::NotRunning)?;
        sender
            .send(viewport)
            .map_err(|_| ViewportError::ReceiverDropped)
    }

    pub fn is_running(&self) -> bool {
        self.sender().is_some()
    }
}

impl ViewportSource for ManualViewportSource {
    fn start(&self) -> Result<mpsc::UnboundedReceiver<Viewport>, ViewportError> {
        let mut guard = self.sender();
        if guard.is_some() {
            return Err(ViewportError::AlreadyStarted);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *guard = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Dropping the sender closes the channel.
        *self.sender() = None;
    }
}
