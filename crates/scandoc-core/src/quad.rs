use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Four named corners of a document candidate.
///
/// A `Quad` carries no coordinate space of its own; every point is
/// interpreted relative to the space named by the producing API (detector
/// space, capture-image space or display space, see [`crate::ViewTransform`]).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub top_left: Point2<f32>,
    pub top_right: Point2<f32>,
    pub bottom_right: Point2<f32>,
    pub bottom_left: Point2<f32>,
}

impl Quad {
    pub fn new(
        top_left: Point2<f32>,
        top_right: Point2<f32>,
        bottom_right: Point2<f32>,
        bottom_left: Point2<f32>,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Axis-aligned quad spanning `(x0, y0)..(x1, y1)` in a y-down space.
    pub fn axis_aligned(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        )
    }

    /// Size metric used for candidate selection: top-edge length plus
    /// left-edge length.
    ///
    /// Only two of the four edges enter the sum. True half-perimeter would
    /// average opposing edges; this approximation is kept because selection
    /// behavior depends on it.
    pub fn half_perimeter(&self) -> f32 {
        let top = (self.top_left - self.top_right).norm();
        let left = (self.top_left - self.bottom_left).norm();
        top + left
    }

    /// Corners in drawing order: tl, tr, br, bl (a closed loop).
    pub fn loop_points(&self) -> [Point2<f32>; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Apply one point map to all four corners identically.
    pub fn map<F: Fn(Point2<f32>) -> Point2<f32>>(&self, f: F) -> Self {
        Self {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            bottom_left: f(self.bottom_left),
        }
    }

    /// True when the corner loop has near-zero area or opposite edges
    /// properly cross (a "bow-tie" produced by interactive dragging).
    ///
    /// The editor never calls this; user-made degenerate quads are legal.
    /// It backs the optional guard in [`crate::RectifyOptions`].
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c, d] = self.loop_points();
        if polygon_area(&[a, b, c, d]).abs() < 1e-6 {
            return true;
        }
        segments_cross(a, b, c, d) || segments_cross(b, c, d, a)
    }
}

fn polygon_area(pts: &[Point2<f32>; 4]) -> f32 {
    let mut acc = 0.0;
    for i in 0..4 {
        let p = pts[i];
        let q = pts[(i + 1) % 4];
        acc += p.x * q.y - q.x * p.y;
    }
    0.5 * acc
}

fn orient(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    (b - a).perp(&(c - a))
}

/// Proper crossing of segments `ab` and `cd` (shared endpoints do not count).
fn segments_cross(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>, d: Point2<f32>) -> bool {
    let d1 = orient(a, b, c);
    let d2 = orient(a, b, d);
    let d3 = orient(c, d, a);
    let d4 = orient(c, d, b);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// Pick the largest candidate by [`Quad::half_perimeter`].
///
/// Strictly-greater comparison: of equal-sized candidates the first in the
/// slice wins. Returns `None` for an empty slice. Values are raw pixel
/// lengths; all candidates of one call come from the same frame, so no
/// per-image normalization is applied.
pub fn biggest_quad(candidates: &[Quad]) -> Option<Quad> {
    let mut best: Option<(f32, Quad)> = None;
    for &q in candidates {
        let hp = q.half_perimeter();
        if best.map_or(true, |(best_hp, _)| hp > best_hp) {
            best = Some((hp, q));
        }
    }
    best.map(|(_, q)| q)
}
