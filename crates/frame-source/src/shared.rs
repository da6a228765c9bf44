//! Shared camera handle
//!
//! The frame worker reads from the camera while start/stop control operations
//! install and release it concurrently. A single exclusive lock covers
//! install, read, and release so a release can never race an in-flight read.

use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::{FrameError, FrameSource, VideoFrame};

/// Exclusive, shareable handle to an optional frame source.
#[derive(Clone, Default)]
pub struct SharedCamera {
    inner: Arc<Mutex<Option<Box<dyn FrameSource>>>>,
}

impl SharedCamera {
    /// Create an empty handle (no source installed)
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a frame source, replacing any previous one.
    pub fn install(&self, source: Box<dyn FrameSource>) {
        let mut slot = self.lock();
        if slot.is_some() {
            warn!("Replacing an already-installed frame source");
        }
        *slot = Some(source);
    }

    /// Whether a source is currently installed.
    pub fn is_held(&self) -> bool {
        self.lock().is_some()
    }

    /// Read the next frame under the exclusive lock.
    ///
    /// Returns [`FrameError::NotInitialized`] when no source is installed
    /// (the worker treats this as loss of the frame source and exits);
    /// `Ok(None)` is a transient empty read.
    pub fn read(&self) -> Result<Option<VideoFrame>, FrameError> {
        let mut slot = self.lock();
        match slot.as_mut() {
            Some(source) => source.read(),
            None => Err(FrameError::NotInitialized),
        }
    }

    /// Release the installed source, if any. Idempotent.
    pub fn release(&self) {
        let mut slot = self.lock();
        *slot = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Box<dyn FrameSource>>> {
        // A poisoned lock only means a panic elsewhere while holding it; the
        // slot itself is still a valid Option.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
