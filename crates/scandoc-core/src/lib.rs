//! Core geometry and detection state for live document scanning.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete edge detector, camera stack or UI toolkit; it
//! covers the logic between a black-box quadrilateral detector and the
//! final perspective-corrected still:
//!
//! - [`Quad`] and [`biggest_quad`]: the four-corner data model and the
//!   per-frame candidate selection;
//! - [`ConfidenceTracker`]: temporal smoothing of detection results;
//! - [`ViewTransform`]: the detector-space / capture-image-space /
//!   display-space coordinate chain;
//! - [`PerspectiveCorrector`] and [`HomographyCorrector`]: the
//!   rectification seam and its default homography-warp implementation.

mod confidence;
mod homography;
mod image;
mod logger;
mod quad;
mod rectify;
mod transform;

pub use confidence::{ConfidenceTracker, CONFIDENCE_STEP};
pub use homography::{homography_from_corners, Homography};
pub use image::{GrayImage, GrayImageView};
pub use quad::{biggest_quad, Quad};
pub use rectify::{HomographyCorrector, PerspectiveCorrector, RectifyError, RectifyOptions};
pub use transform::{
    content_frame, content_scale, ContentFrame, DisplayBounds, ImageSize, TransformError,
    ViewTransform,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
