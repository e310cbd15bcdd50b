use scandoc_core::{GrayImage, GrayImageView, Quad};

/// Black-box quadrilateral detector.
///
/// Given an image, returns zero or more candidate quads with corners in
/// detector space (origin bottom-left, y up, capture resolution). An empty
/// result is the normal "no document in view" case, never an error. The
/// detector instance is passed into the session explicitly; there is no
/// process-wide shared detector.
pub trait QuadDetector {
    fn detect(&self, image: &GrayImageView<'_>) -> Vec<Quad>;
}

impl<T: QuadDetector + ?Sized> QuadDetector for &T {
    fn detect(&self, image: &GrayImageView<'_>) -> Vec<Quad> {
        (**self).detect(image)
    }
}

/// Pixel-level contrast/color filter collaborator.
///
/// Filtering itself is outside this pipeline; implementations are supplied
/// by the caller and applied to the still at capture time.
pub trait FrameFilter {
    fn apply(&self, image: &GrayImageView<'_>) -> GrayImage;
}

/// Adapt an `image::GrayImage` into the borrowed view the pipeline works on.
#[cfg(feature = "image")]
pub fn gray_view(img: &image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}
