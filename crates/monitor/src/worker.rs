//! Frame worker
//!
//! One dedicated task processes frames sequentially and is the sole writer
//! of all per-session detection state, so the state machine itself needs no
//! locking. Transient gaps (no frame, no face, no detection) skip only the
//! affected detector's contribution; the loop exits solely on the
//! cancellation flag or loss of the frame source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use frame_source::{FrameError, SharedCamera, VideoFrame};
use tracing::{info, warn};

use detection::{
    Calibration, DetectedEvent, DetectionConfig, EyeClosureDetector, PhonePresenceDetector,
    SignalSmoother,
};
use storage::Repository;
use vision::landmarks::primary_face;

use crate::aggregate;
use crate::service::{MonitorConfig, VisionPipeline};

/// Everything the worker task needs, owned for its lifetime
pub(crate) struct WorkerContext {
    pub repo: Arc<Repository>,
    pub camera: SharedCamera,
    pub pipeline: VisionPipeline,
    pub active: Arc<AtomicBool>,
    pub config: MonitorConfig,
    pub user_id: i64,
    pub session_id: i64,
    /// Per-user sustained-closure setting (seconds)
    pub eye_closure_secs: f64,
}

/// Per-session detection state, owned exclusively by the worker
pub(crate) struct FrameState {
    calibration: Calibration,
    smoother: SignalSmoother,
    eye: EyeClosureDetector,
    phone: PhonePresenceDetector,
    config: DetectionConfig,
}

impl FrameState {
    pub(crate) fn new(config: &DetectionConfig, eye_closure_secs: f64) -> Self {
        Self {
            calibration: Calibration::new(config.baseline_frames, config.fallback_baseline),
            smoother: SignalSmoother::new(config.smooth_window),
            eye: EyeClosureDetector::new(eye_closure_secs, config.eye_cooldown_secs),
            phone: PhonePresenceDetector::new(config),
            config: config.clone(),
        }
    }

    /// Run both detectors on one frame. Each may contribute at most one event.
    pub(crate) fn process_frame(
        &mut self,
        frame: &VideoFrame,
        pipeline: &mut VisionPipeline,
        now: f64,
    ) -> Vec<DetectedEvent> {
        let mut events = Vec::new();

        // Eye signal: landmarks -> EAR -> calibration + smoothing -> closure
        let mut smoothed = None;
        match pipeline.extractor.process(frame) {
            Ok(faces) => {
                if let Some(face) = primary_face(&faces) {
                    if let Some(ear) = vision::average_ear(face, frame.width, frame.height) {
                        self.calibration.observe(ear);
                        smoothed = Some(self.smoother.push(ear));
                    }
                }
            }
            Err(e) => warn!(error = %e, "Landmark extraction failed, skipping frame"),
        }

        let threshold = self
            .calibration
            .threshold(self.config.dynamic_multiplier, self.config.fallback_threshold);
        if let Some(event) = self.eye.process(smoothed, threshold, now) {
            events.push(event);
        }

        // Phone signal: a detector error skips this frame's contribution
        // without resetting the consecutive-frame counter
        match pipeline.detector.infer(frame) {
            Ok(boxes) => {
                if let Some(event) = self.phone.process(&boxes, now) {
                    events.push(event);
                }
            }
            Err(e) => warn!(error = %e, "Object detection failed, skipping frame"),
        }

        events
    }
}

/// The worker loop. Finalization of the session is its last action and runs
/// even when the camera was already released by the stop operation.
pub(crate) async fn run(mut ctx: WorkerContext) {
    info!(
        session_id = ctx.session_id,
        user_id = ctx.user_id,
        "Frame worker started"
    );

    let mut state = FrameState::new(&ctx.config.detection, ctx.eye_closure_secs);
    let clock = Instant::now();

    while ctx.active.load(Ordering::SeqCst) {
        let frame = match ctx.camera.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                // Transient empty read
                tokio::time::sleep(ctx.config.retry_interval).await;
                continue;
            }
            Err(FrameError::NotInitialized) => {
                info!("Frame source lost, worker exiting");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Frame read failed, retrying");
                tokio::time::sleep(ctx.config.retry_interval).await;
                continue;
            }
        };

        // Selfie-view normalization
        let frame = frame.flip_horizontal();
        let now = clock.elapsed().as_secs_f64();

        for event in state.process_frame(&frame, &mut ctx.pipeline, now) {
            let appended = ctx.repo.append_event(
                ctx.user_id,
                ctx.session_id,
                event.kind.as_str(),
                event.duration,
            );
            if let Err(e) = appended {
                warn!(error = %e, "Failed to record event");
            }
        }

        tokio::time::sleep(ctx.config.poll_interval).await;
    }

    // Status must reflect worker exit even when stop was never called
    // (e.g. the loop ended because the frame source was lost).
    ctx.active.store(false, Ordering::SeqCst);

    match aggregate::finalize_session(&ctx.repo, ctx.session_id, Utc::now()) {
        Ok(Some(session)) => info!(
            session_id = session.id,
            total = session.total_duration,
            focus = session.focus_duration,
            distraction = session.distraction_duration,
            "Frame worker stopped"
        ),
        Ok(None) => info!(session_id = ctx.session_id, "Session already finalized"),
        Err(e) => warn!(error = %e, "Session finalization failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::VisionPipeline;
    use std::time::Duration;
    use vision::landmarks::{FaceLandmarks, LandmarkExtractor, NormalizedPoint};
    use vision::objects::{DetectedObject, ObjectDetector};
    use vision::{VisionError, NullDetector, NullExtractor};

    /// Landmark set whose eye contours produce the requested EAR on a
    /// square frame (horizontal width 0.1, eyelid gap scaled to match).
    fn face_with_ear(ear: f32) -> FaceLandmarks {
        let mut points = vec![NormalizedPoint::new(0.0, 0.0); 468];
        let half_gap = ear * 0.1 / 2.0;
        for indices in [&vision::ear::LEFT_EYE, &vision::ear::RIGHT_EYE] {
            points[indices[0]] = NormalizedPoint::new(0.2, 0.5);
            points[indices[3]] = NormalizedPoint::new(0.3, 0.5);
            points[indices[1]] = NormalizedPoint::new(0.23, 0.5 - half_gap);
            points[indices[5]] = NormalizedPoint::new(0.23, 0.5 + half_gap);
            points[indices[2]] = NormalizedPoint::new(0.27, 0.5 - half_gap);
            points[indices[4]] = NormalizedPoint::new(0.27, 0.5 + half_gap);
        }
        FaceLandmarks::new(points)
    }

    struct ScriptedExtractor {
        ears: Vec<Option<f32>>,
        cursor: usize,
    }

    impl LandmarkExtractor for ScriptedExtractor {
        fn process(&mut self, _frame: &VideoFrame) -> Result<Vec<FaceLandmarks>, VisionError> {
            let ear = self.ears.get(self.cursor).copied().flatten();
            self.cursor += 1;
            Ok(ear.map(|e| vec![face_with_ear(e)]).unwrap_or_default())
        }
    }

    struct ScriptedDetector {
        boxes: Vec<DetectedObject>,
    }

    impl ObjectDetector for ScriptedDetector {
        fn infer(&mut self, _frame: &VideoFrame) -> Result<Vec<DetectedObject>, VisionError> {
            Ok(self.boxes.clone())
        }
    }

    fn pipeline_with_ears(ears: Vec<Option<f32>>) -> VisionPipeline {
        VisionPipeline {
            extractor: Box::new(ScriptedExtractor { ears, cursor: 0 }),
            detector: Box::new(NullDetector),
        }
    }

    fn config() -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_millis(1),
            retry_interval: Duration::from_millis(1),
            detection: DetectionConfig::default(),
        }
    }

    #[test]
    fn test_sustained_closure_produces_one_event() {
        let cfg = config();
        // Closure setting 0.5s; eyes closed (EAR 0.1) for 1.0s at 10 fps
        let mut state = FrameState::new(&cfg.detection, 0.5);
        let mut pipeline = pipeline_with_ears(vec![Some(0.1); 11]);

        let mut events = Vec::new();
        for i in 0..11 {
            let frame = VideoFrame::blank(100, 100, i as u32);
            events.extend(state.process_frame(&frame, &mut pipeline, i as f64 * 0.1));
        }

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, detection::EventKind::EyeClosed);
        assert!(events[0].duration >= 0.5);
    }

    #[test]
    fn test_no_face_frames_skip_eye_detector() {
        let cfg = config();
        let mut state = FrameState::new(&cfg.detection, 0.5);
        // Closed, gap, closed: the gap must not reset the closure timer
        let mut ears = vec![Some(0.1f32), None, None, Some(0.1), Some(0.1), Some(0.1)];
        ears.resize(12, Some(0.1));
        let mut pipeline = pipeline_with_ears(ears);

        let mut events = Vec::new();
        for i in 0..12 {
            let frame = VideoFrame::blank(100, 100, i as u32);
            events.extend(state.process_frame(&frame, &mut pipeline, i as f64 * 0.1));
        }
        assert_eq!(events.len(), 1);
        // Closure is measured from the first closed frame, across the gap
        assert!(events[0].duration >= 0.5);
    }

    #[test]
    fn test_phone_presence_produces_event() {
        let cfg = config();
        let mut state = FrameState::new(&cfg.detection, 3.0);
        let mut pipeline = VisionPipeline {
            extractor: Box::new(NullExtractor),
            detector: Box::new(ScriptedDetector {
                boxes: vec![DetectedObject::new("cell phone", 0.9, [0.0, 0.0, 50.0, 40.0])],
            }),
        };

        let mut events = Vec::new();
        for i in 0..5 {
            let frame = VideoFrame::blank(100, 100, i as u32);
            events.extend(state.process_frame(&frame, &mut pipeline, i as f64 * 0.1));
        }

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, detection::EventKind::PhoneDetected);
    }

    #[test]
    fn test_calibration_drives_dynamic_threshold() {
        let mut cfg = config();
        cfg.detection.baseline_frames = 5;
        let mut state = FrameState::new(&cfg.detection, 0.2);

        // Calibrate on open eyes (EAR 0.30 -> threshold 0.21), then hold
        // 0.15 below the dynamic threshold until closures confirm.
        let mut ears: Vec<Option<f32>> = vec![Some(0.30); 5];
        ears.extend(vec![Some(0.15); 40]);
        let mut pipeline = pipeline_with_ears(ears);

        let mut events = Vec::new();
        for i in 0..45 {
            let frame = VideoFrame::blank(100, 100, i as u32);
            events.extend(state.process_frame(&frame, &mut pipeline, i as f64 * 0.1));
        }

        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.kind == detection::EventKind::EyeClosed));
    }
}
