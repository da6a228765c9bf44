//! Object detection contract

use frame_source::VideoFrame;
use serde::{Deserialize, Serialize};

use crate::VisionError;

/// Detected object with classification and pixel-space bounding box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Class label as reported by the detector (e.g. "cell phone")
    pub label: String,

    /// Detection confidence
    pub confidence: f32,

    /// Bounding box [x, y, width, height] in pixels
    pub bbox: [f32; 4],
}

impl DetectedObject {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: [f32; 4]) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }

    /// Bounding-box area in square pixels
    pub fn area(&self) -> f32 {
        self.bbox[2] * self.bbox[3]
    }

    /// Whether the label names a handheld phone.
    ///
    /// Detector label vocabularies vary ("cell phone" in COCO, "mobile
    /// phone" elsewhere), so matching is case-insensitive over a small set.
    pub fn is_phone(&self) -> bool {
        matches!(
            self.label.to_lowercase().as_str(),
            "cell phone" | "cellphone" | "mobile phone" | "phone"
        )
    }
}

/// Contract for per-frame object detection.
///
/// No ordering guarantee is assumed by consumers beyond "first qualifying
/// match"; an empty result means nothing was detected this frame.
pub trait ObjectDetector: Send {
    fn infer(&mut self, frame: &VideoFrame) -> Result<Vec<DetectedObject>, VisionError>;
}

/// Detector used when no object model is configured. Detects nothing.
#[derive(Debug, Default)]
pub struct NullDetector;

impl ObjectDetector for NullDetector {
    fn infer(&mut self, _frame: &VideoFrame) -> Result<Vec<DetectedObject>, VisionError> {
        Ok(Vec::new())
    }
}
