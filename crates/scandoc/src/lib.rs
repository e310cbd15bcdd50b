//! Live document scanning: edge detection, interactive correction and
//! perspective-corrected capture.
//!
//! This crate composes the workspace into one pipeline:
//! - `scandoc-core`: quad geometry, candidate selection, confidence
//!   tracking, the coordinate transform chain and rectification;
//! - `scandoc-editor`: the draggable corner editor;
//! - here: the collaborator traits ([`QuadDetector`], [`FrameFilter`]) and
//!   the frame-driven [`ScanSession`] state machine.
//!
//! ## Quickstart
//!
//! ```no_run
//! use scandoc::{HomographyCorrector, ScanSession, SessionConfig};
//! use scandoc::{GrayImageView, Quad, QuadDetector};
//!
//! struct MyDetector;
//! impl QuadDetector for MyDetector {
//!     fn detect(&self, _image: &GrayImageView<'_>) -> Vec<Quad> {
//!         Vec::new()
//!     }
//! }
//!
//! let mut session = ScanSession::new(
//!     MyDetector,
//!     HomographyCorrector::default(),
//!     SessionConfig::default(),
//! );
//! session.start();
//! // per frame: session.on_frame(&frame_view);
//! // every 0.5 s: session.request_detection();
//! ```
//!
//! ## Event model
//!
//! The session is single-threaded and event-driven: frames, the periodic
//! detection timer and editor gestures are all delivered serialized to one
//! logical thread. Detection and rectification are synchronous calls from
//! the session's perspective; run them off-thread in a real integration and
//! feed the results back as ordinary events.

pub use scandoc_core as core;
pub use scandoc_editor as editor;

pub use scandoc_core::{
    biggest_quad, content_frame, content_scale, ConfidenceTracker, ContentFrame, DisplayBounds,
    GrayImage, GrayImageView, Homography, HomographyCorrector, ImageSize, PerspectiveCorrector,
    Quad, RectifyError, RectifyOptions, TransformError, ViewTransform, CONFIDENCE_STEP,
};
pub use scandoc_editor::{CornerId, QuadEditor, HANDLE_MARGIN};

mod detector;
mod session;

pub use detector::{FrameFilter, QuadDetector};
pub use session::{
    CaptureError, CaptureResult, FrameOutcome, ImageFilter, ScanSession, SessionConfig,
    SkipReason, TransientEffect,
};

#[cfg(feature = "image")]
pub use detector::gray_view;
