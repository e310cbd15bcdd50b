use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{homography_from_corners, GrayImage, GrayImageView, Quad};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RectifyError {
    #[error("degenerate quadrilateral rejected")]
    DegenerateQuad,
    #[error("homography estimation failed for the given corners")]
    SingularHomography,
    #[error("empty rectified output size ({width}x{height})")]
    EmptyOutput { width: usize, height: usize },
}

/// Settings for the built-in corrector.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct RectifyOptions {
    /// Refuse self-intersecting or collapsed quads instead of warping them.
    ///
    /// User-dragged corners may legally form such quads, so this is off by
    /// default and left to the caller's policy.
    pub reject_degenerate: bool,
    /// Fixed output size in pixels. `None` derives it from the quad's
    /// longest opposing edges.
    pub output_size: Option<(usize, usize)>,
}

/// Maps a quadrilateral region of an image onto an axis-aligned rectangle
/// spanning the output's full extent.
///
/// The quad must already be expressed in the same space as the image data
/// (capture-image space, not display space). Implementations are pure; the
/// pipeline tracks no side effects through this seam.
pub trait PerspectiveCorrector {
    fn rectify(&self, image: &GrayImageView<'_>, quad: &Quad) -> Result<GrayImage, RectifyError>;
}

/// Default corrector: 4-point homography from the output rectangle to the
/// quad, back-warped with bilinear sampling.
#[derive(Clone, Copy, Debug, Default)]
pub struct HomographyCorrector {
    options: RectifyOptions,
}

impl HomographyCorrector {
    pub fn new(options: RectifyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RectifyOptions {
        &self.options
    }

    fn output_size(&self, quad: &Quad) -> (usize, usize) {
        if let Some(size) = self.options.output_size {
            return size;
        }
        let top = (quad.top_left - quad.top_right).norm();
        let bottom = (quad.bottom_left - quad.bottom_right).norm();
        let left = (quad.top_left - quad.bottom_left).norm();
        let right = (quad.top_right - quad.bottom_right).norm();
        (
            top.max(bottom).round() as usize,
            left.max(right).round() as usize,
        )
    }
}

impl PerspectiveCorrector for HomographyCorrector {
    fn rectify(&self, image: &GrayImageView<'_>, quad: &Quad) -> Result<GrayImage, RectifyError> {
        if self.options.reject_degenerate && quad.is_degenerate() {
            return Err(RectifyError::DegenerateQuad);
        }

        let (out_w, out_h) = self.output_size(quad);
        if out_w == 0 || out_h == 0 {
            return Err(RectifyError::EmptyOutput {
                width: out_w,
                height: out_h,
            });
        }

        let rect = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(out_w as f32, 0.0),
            Point2::new(out_w as f32, out_h as f32),
            Point2::new(0.0_f32, out_h as f32),
        ];
        let corners = [
            quad.top_left,
            quad.top_right,
            quad.bottom_right,
            quad.bottom_left,
        ];
        let h_img_from_rect =
            homography_from_corners(&rect, &corners).ok_or(RectifyError::SingularHomography)?;

        let mut out = GrayImage::new(out_w, out_h);
        for y in 0..out_h {
            for x in 0..out_w {
                // sample at pixel center
                let p = h_img_from_rect.apply(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
                out.data[y * out_w + x] = image.sample_bilinear_u8(p.x, p.y);
            }
        }
        Ok(out)
    }
}
