//! Facial landmark contract and primary-face selection

use frame_source::VideoFrame;
use serde::{Deserialize, Serialize};

use crate::VisionError;

/// A single landmark position, normalized to [0, 1] frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Ordered landmark set for one detected face
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Fixed-size ordered sequence of normalized (x, y) positions
    pub points: Vec<NormalizedPoint>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<NormalizedPoint>) -> Self {
        Self { points }
    }

    /// Normalized bounding-box area of the landmark cloud.
    ///
    /// Used to pick the primary face when multiple are present.
    pub fn bounding_area(&self) -> f32 {
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;

        for p in &self.points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        if self.points.is_empty() {
            return 0.0;
        }
        (max_x - min_x) * (max_y - min_y)
    }
}

/// Select the landmark set with the largest bounding-box area as primary.
pub fn primary_face(faces: &[FaceLandmarks]) -> Option<&FaceLandmarks> {
    faces
        .iter()
        .max_by(|a, b| a.bounding_area().total_cmp(&b.bounding_area()))
}

/// Contract for facial landmark extraction.
///
/// Returns zero or more landmark sets per frame; an empty result is a
/// transient signal gap, not an error.
pub trait LandmarkExtractor: Send {
    fn process(&mut self, frame: &VideoFrame) -> Result<Vec<FaceLandmarks>, VisionError>;
}

/// Extractor used when no landmark model is configured. Detects nothing.
#[derive(Debug, Default)]
pub struct NullExtractor;

impl LandmarkExtractor for NullExtractor {
    fn process(&mut self, _frame: &VideoFrame) -> Result<Vec<FaceLandmarks>, VisionError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_at(origin: f32, size: f32) -> FaceLandmarks {
        FaceLandmarks::new(vec![
            NormalizedPoint::new(origin, origin),
            NormalizedPoint::new(origin + size, origin + size),
        ])
    }

    #[test]
    fn test_primary_face_is_largest() {
        let faces = vec![face_at(0.1, 0.2), face_at(0.5, 0.4), face_at(0.0, 0.1)];
        let primary = primary_face(&faces).unwrap();
        assert!((primary.bounding_area() - 0.16).abs() < 1e-6);
    }

    #[test]
    fn test_primary_face_empty() {
        assert!(primary_face(&[]).is_none());
    }

    #[test]
    fn test_empty_landmarks_have_zero_area() {
        assert_eq!(FaceLandmarks::default().bounding_area(), 0.0);
    }
}
