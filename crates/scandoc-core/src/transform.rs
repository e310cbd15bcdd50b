//! Coordinate reconciliation between the three spaces of the pipeline:
//!
//! 1. detector space — origin bottom-left, y up, over the capture image in
//!    its sensor-native (landscape) orientation;
//! 2. capture-image space — origin top-left, y down;
//! 3. display space — the portrait view showing the rotated image
//!    aspect-fit, with letterbox offsets.

use nalgebra::{Matrix3, Point2, Vector3};
use serde::{Deserialize, Serialize};

use crate::Quad;

/// Natural pixel size of a capture image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

impl ImageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size after the 90° rotation into the display orientation.
    pub fn rotated(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Size of the on-screen view the image is fit into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub width: f32,
    pub height: f32,
}

impl DisplayBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Aspect-fit region of the display actually covered by the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentFrame {
    pub origin: Point2<f32>,
    pub width: f32,
    pub height: f32,
}

/// Aspect-fit scale: the smaller of the width and height ratios.
pub fn content_scale(bounds: DisplayBounds, image: ImageSize) -> f32 {
    (bounds.width / image.width).min(bounds.height / image.height)
}

/// Letterboxed frame of an aspect-fit image, centered in the display.
pub fn content_frame(bounds: DisplayBounds, image: ImageSize) -> ContentFrame {
    let scale = content_scale(bounds, image);
    let width = image.width * scale;
    let height = image.height * scale;
    ContentFrame {
        origin: Point2::new(0.5 * (bounds.width - width), 0.5 * (bounds.height - height)),
        width,
        height,
    }
}

fn finite_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransformError {
    #[error("image size must be positive (width={width}, height={height})")]
    EmptyImage { width: f32, height: f32 },
    #[error("display bounds must be positive (width={width}, height={height})")]
    EmptyDisplay { width: f32, height: f32 },
    #[error("transform chain is not invertible")]
    NotInvertible,
}

/// Affine chain between detector space and display space.
///
/// The forward map composes, in this exact order:
/// vertical flip, translation by the image height (undoing the flip's sign
/// change), 90° rotation into the portrait display, uniform aspect-fit
/// scale, then the letterbox offset. The order is load-bearing; rotating
/// before flipping yields a mirrored result.
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
    forward: Matrix3<f32>,
    inverse: Matrix3<f32>,
}

impl ViewTransform {
    /// Build the chain for an image of `image` natural size shown inside
    /// `display`. Fails on empty or non-finite sizes; everything else is
    /// invertible.
    pub fn new(image: ImageSize, display: DisplayBounds) -> Result<Self, TransformError> {
        if !(finite_positive(image.width) && finite_positive(image.height)) {
            return Err(TransformError::EmptyImage {
                width: image.width,
                height: image.height,
            });
        }
        if !(finite_positive(display.width) && finite_positive(display.height)) {
            return Err(TransformError::EmptyDisplay {
                width: display.width,
                height: display.height,
            });
        }

        let rotated = image.rotated();
        let scale = content_scale(display, rotated);
        let frame = content_frame(display, rotated);

        // (a) y -> -y
        let flip = Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, -1.0, 0.0, //
            0.0, 0.0, 1.0,
        );
        // (b) shift the flipped range back into [0, H]
        let compensate = Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, 1.0, image.height, //
            0.0, 0.0, 1.0,
        );
        // (c) 90° clockwise: (x, y) -> (H - y, x)
        let rotate = Matrix3::new(
            0.0, -1.0, image.height, //
            1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0,
        );
        // (d) uniform aspect-fit scale
        let fit = Matrix3::new(
            scale, 0.0, 0.0, //
            0.0, scale, 0.0, //
            0.0, 0.0, 1.0,
        );
        // (e) letterbox offset
        let offset = Matrix3::new(
            1.0, 0.0, frame.origin.x, //
            0.0, 1.0, frame.origin.y, //
            0.0, 0.0, 1.0,
        );

        let forward = offset * fit * rotate * compensate * flip;
        let inverse = forward
            .try_inverse()
            .ok_or(TransformError::NotInvertible)?;

        Ok(Self { forward, inverse })
    }

    #[inline]
    fn apply(m: &Matrix3<f32>, p: Point2<f32>) -> Point2<f32> {
        let v = m * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v.x / v.z, v.y / v.z)
    }

    /// Detector-space point to display space.
    #[inline]
    pub fn point_to_display(&self, p: Point2<f32>) -> Point2<f32> {
        Self::apply(&self.forward, p)
    }

    /// Display-space point back to detector space (e.g. a corrected corner
    /// fed back toward detection).
    #[inline]
    pub fn point_to_detector(&self, p: Point2<f32>) -> Point2<f32> {
        Self::apply(&self.inverse, p)
    }

    /// Map all four corners through the forward chain. No corner is
    /// special-cased.
    pub fn to_display(&self, quad: &Quad) -> Quad {
        quad.map(|p| self.point_to_display(p))
    }

    /// Algebraic inverse of [`to_display`](Self::to_display).
    pub fn to_detector(&self, quad: &Quad) -> Quad {
        quad.map(|p| self.point_to_detector(p))
    }
}
