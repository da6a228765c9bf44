//! Synthetic frame source
//!
//! Stands in for a real capture device when none is wired, mirroring the
//! mock-when-unconfigured behavior of the detection models. Produces blank
//! RGB frames with a monotonically increasing sequence number.

use crate::{FrameError, FrameSource, VideoFrame};

/// Frame source that generates blank frames on demand.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    sequence: u32,
}

impl SyntheticSource {
    /// Create a synthetic source with the given frame dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sequence: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn read(&mut self) -> Result<Option<VideoFrame>, FrameError> {
        let frame = VideoFrame::blank(self.width, self.height, self.sequence);
        self.sequence = self.sequence.wrapping_add(1);
        Ok(Some(frame))
    }
}
