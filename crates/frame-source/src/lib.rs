//! Frame Source Library for Attention Monitoring
//!
//! Provides the video frame type, the frame-source contract consumed by the
//! monitoring loop, and the shared camera handle that mediates between the
//! frame worker and the start/stop control operations.

pub mod frame;
pub mod shared;
pub mod synthetic;

pub use frame::VideoFrame;
pub use shared::SharedCamera;
pub use synthetic::SyntheticSource;

use thiserror::Error;

/// Frame source error types
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Read error: {0}")]
    Read(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),

    #[error("Camera not initialized")]
    NotInitialized,
}

/// Contract for anything that can deliver video frames to the monitor loop.
///
/// `Ok(None)` is a transient empty read (the caller skips the frame and
/// retries); `Err` carries a device-level failure. Implementations must be
/// safe to call while the handle is held inside [`SharedCamera`]'s lock, and
/// therefore must not block indefinitely.
pub trait FrameSource: Send {
    /// Read the next frame, if one is available.
    fn read(&mut self) -> Result<Option<VideoFrame>, FrameError>;
}

/// Camera capture configuration
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 15,
        }
    }
}

impl CameraConfig {
    /// Webcam config for desk-facing attention monitoring
    pub fn webcam() -> Self {
        Self::default()
    }
}
