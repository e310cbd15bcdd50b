use serde::{Deserialize, Serialize};

use scandoc_core::{
    biggest_quad, ConfidenceTracker, GrayImageView, PerspectiveCorrector, Quad, RectifyError,
};

use crate::detector::{FrameFilter, QuadDetector};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Selectable capture filter. Selection only; the pixel work is done by a
/// [`FrameFilter`] supplied at capture time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ImageFilter {
    /// Contrast boost on colored stills.
    #[default]
    Normal,
    /// Desaturated high-contrast rendition.
    BlackAndWhite,
}

/// Transient visual effect the presentation layer should play after a
/// filter change. The session describes the effect; it never schedules or
/// removes UI itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransientEffect {
    pub blur_overlay: bool,
    pub duration_s: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Run edge detection and overlay tracking on live frames.
    pub border_detection_enabled: bool,
    /// Cadence at which the owner is expected to call
    /// [`ScanSession::request_detection`], in seconds.
    pub detection_interval_s: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            border_detection_enabled: true,
            detection_interval_s: 0.5,
        }
    }
}

/// Why a frame was not processed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    /// `suspend()` was called (app in background).
    Suspended,
    /// The session has not been started or was stopped.
    Stopped,
    /// A capture is running; live frames are dropped, not queued.
    Capturing,
}

/// Result of feeding one live frame through the session.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    Skipped(SkipReason),
    Processed {
        /// Quad to draw over the preview, in detector space. Between
        /// detection cycles this repeats the last accepted candidate.
        overlay: Option<Quad>,
        /// Whether accumulated confidence currently trusts the overlay.
        detection_valid: bool,
        /// Whether this frame consumed the armed detection request.
        ran_detection: bool,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("a capture is already in flight")]
    CaptureInFlight,
    #[error(transparent)]
    Rectify(#[from] RectifyError),
}

/// Outcome of a capture: the (possibly filtered and rectified) still plus
/// the quad that drove the correction, if any.
#[derive(Clone, Debug)]
pub struct CaptureResult {
    pub image: scandoc_core::GrayImage,
    pub quad: Option<Quad>,
}

/// Frame-driven scanning state machine.
///
/// One instance per camera session, owned by the composition root, which
/// also owns the detector and corrector collaborators and injects them
/// here. All events — frames, the periodic detection timer, lifecycle
/// calls — must arrive serialized on one logical thread; nothing in the
/// session blocks or suspends.
///
/// Detection is debounced: the timer arms a flag via
/// [`request_detection`](Self::request_detection) and the next frame
/// consumes it. Re-arming before consumption coalesces, so a slow detector
/// can never build a backlog of stale requests.
pub struct ScanSession<D, C> {
    detector: D,
    corrector: C,
    config: SessionConfig,
    tracker: ConfidenceTracker,
    detect_requested: bool,
    suspended: bool,
    stopped: bool,
    capturing: bool,
    filter: ImageFilter,
}

impl<D: QuadDetector, C: PerspectiveCorrector> ScanSession<D, C> {
    /// Create a session. It starts in the stopped state; call
    /// [`start`](Self::start) once the frame source is running.
    pub fn new(detector: D, corrector: C, config: SessionConfig) -> Self {
        Self {
            detector,
            corrector,
            config,
            tracker: ConfidenceTracker::new(),
            detect_requested: false,
            suspended: false,
            stopped: true,
            capturing: false,
            filter: ImageFilter::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn start(&mut self) {
        self.stopped = false;
        log::debug!(
            "session started (detection every {:.1}s)",
            self.config.detection_interval_s
        );
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.detect_requested = false;
    }

    /// Explicit background hook, called by the owner instead of a global
    /// lifecycle notification. Frames are skipped until `resume()`.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Periodic-timer hook: arm one detection cycle for the next frame.
    pub fn request_detection(&mut self) {
        self.detect_requested = true;
    }

    pub fn filter(&self) -> ImageFilter {
        self.filter
    }

    /// Select the capture filter and describe the transient effect the
    /// presentation layer should play over the preview.
    pub fn set_filter(&mut self, filter: ImageFilter) -> TransientEffect {
        self.filter = filter;
        TransientEffect {
            blur_overlay: true,
            duration_s: 0.25,
        }
    }

    /// Candidate accepted by the most recent detection cycle.
    pub fn last_quad(&self) -> Option<&Quad> {
        self.tracker.last_quad()
    }

    /// Whether detection is both enabled and currently trusted.
    pub fn detection_valid(&self) -> bool {
        self.config.border_detection_enabled && self.tracker.is_valid()
    }

    pub fn tracker(&self) -> &ConfidenceTracker {
        &self.tracker
    }

    /// Feed one live frame, in capture order.
    ///
    /// Runs a detection cycle only when one was armed; otherwise the
    /// overlay repeats the tracker's last candidate.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn on_frame(&mut self, frame: &GrayImageView<'_>) -> FrameOutcome {
        if self.suspended {
            return FrameOutcome::Skipped(SkipReason::Suspended);
        }
        if self.stopped {
            return FrameOutcome::Skipped(SkipReason::Stopped);
        }
        if self.capturing {
            return FrameOutcome::Skipped(SkipReason::Capturing);
        }

        if !self.config.border_detection_enabled {
            return FrameOutcome::Processed {
                overlay: None,
                detection_valid: false,
                ran_detection: false,
            };
        }

        let ran_detection = self.detect_requested;
        if ran_detection {
            self.detect_requested = false;
            let candidates = self.detector.detect(frame);
            let selected = biggest_quad(&candidates);
            log::debug!(
                "detection cycle: {} candidate(s), selected = {}",
                candidates.len(),
                selected.is_some()
            );
            self.tracker.observe(selected);
        }

        FrameOutcome::Processed {
            overlay: self.tracker.last_quad().copied(),
            detection_valid: self.tracker.is_valid(),
            ran_detection,
        }
    }

    /// Capture a still.
    ///
    /// Rejected outright while another capture runs — at most one
    /// rectification is ever in flight. When border detection is enabled
    /// and confidence is valid, the detector is re-run on the (filtered)
    /// still and the biggest quad drives perspective correction; otherwise
    /// the still passes through untouched.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image, filter), fields(width = image.width, height = image.height))
    )]
    pub fn capture(
        &mut self,
        image: &GrayImageView<'_>,
        filter: Option<&dyn FrameFilter>,
    ) -> Result<CaptureResult, CaptureError> {
        if self.capturing {
            return Err(CaptureError::CaptureInFlight);
        }
        self.capturing = true;
        let result = self.capture_inner(image, filter);
        self.capturing = false;
        result
    }

    fn capture_inner(
        &mut self,
        image: &GrayImageView<'_>,
        filter: Option<&dyn FrameFilter>,
    ) -> Result<CaptureResult, CaptureError> {
        let mut still = match filter {
            Some(f) => f.apply(image),
            None => image.to_owned(),
        };

        let mut quad = None;
        if self.config.border_detection_enabled && self.tracker.is_valid() {
            if let Some(selected) = biggest_quad(&self.detector.detect(&still.view())) {
                still = self.corrector.rectify(&still.view(), &selected)?;
                quad = Some(selected);
            } else {
                log::debug!("capture: no candidate on the still, skipping correction");
            }
        }

        Ok(CaptureResult { image: still, quad })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scandoc_core::{GrayImage, HomographyCorrector};

    struct FixedDetector(Vec<Quad>);

    impl QuadDetector for FixedDetector {
        fn detect(&self, _image: &GrayImageView<'_>) -> Vec<Quad> {
            self.0.clone()
        }
    }

    fn document() -> Quad {
        Quad::axis_aligned(10.0, 10.0, 90.0, 90.0)
    }

    fn session(candidates: Vec<Quad>) -> ScanSession<FixedDetector, HomographyCorrector> {
        ScanSession::new(
            FixedDetector(candidates),
            HomographyCorrector::default(),
            SessionConfig::default(),
        )
    }

    fn frame() -> GrayImage {
        GrayImage::new(128, 128)
    }

    #[test]
    fn frames_before_start_are_skipped() {
        let mut s = session(vec![document()]);
        let img = frame();
        assert_eq!(
            s.on_frame(&img.view()),
            FrameOutcome::Skipped(SkipReason::Stopped)
        );
    }

    #[test]
    fn suspend_wins_over_everything_else() {
        let mut s = session(vec![document()]);
        s.start();
        s.suspend();
        let img = frame();
        assert_eq!(
            s.on_frame(&img.view()),
            FrameOutcome::Skipped(SkipReason::Suspended)
        );

        s.resume();
        assert!(matches!(
            s.on_frame(&img.view()),
            FrameOutcome::Processed { .. }
        ));
    }

    #[test]
    fn detection_runs_only_when_armed() {
        let mut s = session(vec![document()]);
        s.start();
        let img = frame();

        // no request armed yet
        let out = s.on_frame(&img.view());
        assert_eq!(
            out,
            FrameOutcome::Processed {
                overlay: None,
                detection_valid: false,
                ran_detection: false,
            }
        );

        s.request_detection();
        // repeated requests coalesce into one cycle
        s.request_detection();
        let out = s.on_frame(&img.view());
        assert!(matches!(
            out,
            FrameOutcome::Processed {
                ran_detection: true,
                ..
            }
        ));

        // the very next frame runs no cycle but keeps the overlay
        let out = s.on_frame(&img.view());
        assert_eq!(
            out,
            FrameOutcome::Processed {
                overlay: Some(document()),
                detection_valid: false,
                ran_detection: false,
            }
        );
    }

    #[test]
    fn stop_disarms_a_pending_detection() {
        let mut s = session(vec![document()]);
        s.start();
        s.request_detection();
        s.stop();
        s.start();
        let img = frame();
        assert!(matches!(
            s.on_frame(&img.view()),
            FrameOutcome::Processed {
                ran_detection: false,
                ..
            }
        ));
    }

    #[test]
    fn disabled_detection_processes_frames_without_overlay() {
        let mut s = ScanSession::new(
            FixedDetector(vec![document()]),
            HomographyCorrector::default(),
            SessionConfig {
                border_detection_enabled: false,
                ..SessionConfig::default()
            },
        );
        s.start();
        s.request_detection();
        let img = frame();
        assert_eq!(
            s.on_frame(&img.view()),
            FrameOutcome::Processed {
                overlay: None,
                detection_valid: false,
                ran_detection: false,
            }
        );
    }

    #[test]
    fn capture_in_flight_is_rejected() {
        let mut s = session(vec![document()]);
        s.start();
        s.capturing = true;
        let img = frame();
        assert!(matches!(
            s.capture(&img.view(), None),
            Err(CaptureError::CaptureInFlight)
        ));

        // frames are also skipped while capturing
        assert_eq!(
            s.on_frame(&img.view()),
            FrameOutcome::Skipped(SkipReason::Capturing)
        );
    }

    #[test]
    fn capture_without_valid_confidence_passes_through() {
        let mut s = session(vec![document()]);
        s.start();
        let img = frame();
        let result = s.capture(&img.view(), None).unwrap();
        assert!(result.quad.is_none());
        assert_eq!(result.image, img);
    }

    #[test]
    fn set_filter_describes_the_overlay_effect() {
        let mut s = session(vec![]);
        let effect = s.set_filter(ImageFilter::BlackAndWhite);
        assert_eq!(s.filter(), ImageFilter::BlackAndWhite);
        assert!(effect.blur_overlay);
        assert!((effect.duration_s - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SessionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.border_detection_enabled, config.border_detection_enabled);
        assert!((back.detection_interval_s - config.detection_interval_s).abs() < f32::EPSILON);
    }
}
