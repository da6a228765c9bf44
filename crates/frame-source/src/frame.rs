//! Video frame type and decoding helpers

use crate::FrameError;

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Create a blank (black) frame of the given dimensions
    pub fn blank(width: u32, height: u32, sequence: u32) -> Self {
        Self {
            data: vec![0u8; (width * height * 3) as usize],
            width,
            height,
            timestamp_ns: 0,
            sequence,
        }
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Mirror the frame horizontally (selfie view)
    pub fn flip_horizontal(&self) -> VideoFrame {
        let mut flipped = Vec::with_capacity(self.data.len());
        for row in 0..self.height {
            for col in (0..self.width).rev() {
                let idx = ((row * self.width + col) * 3) as usize;
                flipped.extend_from_slice(&self.data[idx..idx + 3]);
            }
        }
        VideoFrame {
            data: flipped,
            width: self.width,
            height: self.height,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }
}

/// Decode a JPEG-compressed frame to RGB
pub fn decode_jpeg(jpeg_data: &[u8]) -> Result<VideoFrame, FrameError> {
    let img = image::load_from_memory_with_format(jpeg_data, image::ImageFormat::Jpeg)
        .map_err(|e| FrameError::Decode(e.to_string()))?;
    let rgb = img.to_rgb8();

    Ok(VideoFrame {
        width: rgb.width(),
        height: rgb.height(),
        data: rgb.into_raw(),
        timestamp_ns: 0,
        sequence: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_pixel_bounds() {
        let frame = VideoFrame::blank(4, 4, 0);
        assert!(frame.get_pixel(3, 3).is_some());
        assert!(frame.get_pixel(4, 0).is_none());
        assert!(frame.get_pixel(0, 4).is_none());
    }

    #[test]
    fn test_flip_horizontal() {
        let mut frame = VideoFrame::blank(2, 1, 0);
        frame.data = vec![10, 11, 12, 20, 21, 22];

        let flipped = frame.flip_horizontal();
        assert_eq!(flipped.get_pixel(0, 0), Some([20, 21, 22]));
        assert_eq!(flipped.get_pixel(1, 0), Some([10, 11, 12]));
    }
}
