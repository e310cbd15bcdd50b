use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use scandoc_core::{DisplayBounds, Quad};

/// Clamp margin: a dragged handle never gets closer than this to a canvas
/// edge once it has left the canvas.
pub const HANDLE_MARGIN: f32 = 2.0;

// Handle numbering follows the physical layout:
//
//   d (4) ------------- c (3)
//     |                   |
//     |                   |
//   a (1) ------------- b (2)
//
// The tags are the wire protocol toward the presentation layer and must
// not change.

/// One of the four draggable corner handles.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CornerId {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl CornerId {
    pub const ALL: [CornerId; 4] = [
        CornerId::BottomLeft,
        CornerId::BottomRight,
        CornerId::TopRight,
        CornerId::TopLeft,
    ];

    /// Resolve an external handle tag.
    ///
    /// # Panics
    /// Any tag outside `1..=4` is a contract violation and panics.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => CornerId::BottomLeft,
            2 => CornerId::BottomRight,
            3 => CornerId::TopRight,
            4 => CornerId::TopLeft,
            _ => panic!("corner tag out of range: {tag}"),
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            CornerId::BottomLeft => 1,
            CornerId::BottomRight => 2,
            CornerId::TopRight => 3,
            CornerId::TopLeft => 4,
        }
    }

    fn index(self) -> usize {
        self.tag() as usize - 1
    }
}

/// Drag editor over one quadrilateral in display (canvas) coordinates.
///
/// Corners move independently; nothing stops the user from producing a
/// self-intersecting quad, and the editor does not try to repair one.
#[derive(Clone, Debug)]
pub struct QuadEditor {
    bounds: DisplayBounds,
    assigned: Quad,
    corners: Quad,
    drag_offsets: [Option<Vector2<f32>>; 4],
    moved: bool,
}

impl QuadEditor {
    pub fn new(bounds: DisplayBounds, corners: Quad) -> Self {
        Self {
            bounds,
            assigned: corners,
            corners,
            drag_offsets: [None; 4],
            moved: false,
        }
    }

    /// Replace the working quad (e.g. with a fresh detection) and clear the
    /// moved flag.
    pub fn set_corners(&mut self, corners: Quad) {
        self.assigned = corners;
        self.corners = corners;
        self.drag_offsets = [None; 4];
        self.moved = false;
    }

    /// Discard user edits and snap back to the last assigned quad.
    pub fn reset(&mut self) {
        self.corners = self.assigned;
        self.drag_offsets = [None; 4];
        self.moved = false;
    }

    /// Read-only snapshot of the working quad.
    pub fn corners(&self) -> Quad {
        self.corners
    }

    /// Whether any corner has moved since the last `set_corners`. The
    /// presentation layer uses this to show a reset affordance.
    pub fn moved(&self) -> bool {
        self.moved
    }

    pub fn bounds(&self) -> DisplayBounds {
        self.bounds
    }

    /// Current center of one handle.
    pub fn handle_center(&self, id: CornerId) -> Point2<f32> {
        *self.corner(id)
    }

    /// Record where inside the handle the pointer went down, so the corner
    /// does not jump to the pointer position on the first move.
    pub fn begin_drag(&mut self, id: CornerId, pointer: Point2<f32>) {
        self.drag_offsets[id.index()] = Some(pointer - self.handle_center(id));
    }

    /// Move one corner to the pointer position minus the recorded grab
    /// offset, clamping to the canvas, and return the new handle center.
    ///
    /// Without a prior [`begin_drag`](Self::begin_drag) the offset is zero
    /// and the handle snaps its center to the pointer. A candidate inside
    /// the canvas is accepted unmodified; one outside is clamped per axis,
    /// independently, to `[HANDLE_MARGIN, dim - HANDLE_MARGIN]`.
    pub fn update_drag(&mut self, id: CornerId, pointer: Point2<f32>) -> Point2<f32> {
        let offset = self.drag_offsets[id.index()].unwrap_or_else(Vector2::zeros);
        let mut point = pointer - offset;

        if !self.contains(point) {
            point.x = clamp_axis(point.x, self.bounds.width);
            point.y = clamp_axis(point.y, self.bounds.height);
        }

        self.moved = true;
        *self.corner_mut(id) = point;
        log::trace!("corner {} moved to ({:.1}, {:.1})", id.tag(), point.x, point.y);
        point
    }

    /// Forget the grab offset for one handle.
    pub fn end_drag(&mut self, id: CornerId) {
        self.drag_offsets[id.index()] = None;
    }

    fn contains(&self, p: Point2<f32>) -> bool {
        p.x >= 0.0 && p.x <= self.bounds.width && p.y >= 0.0 && p.y <= self.bounds.height
    }

    fn corner(&self, id: CornerId) -> &Point2<f32> {
        match id {
            CornerId::BottomLeft => &self.corners.bottom_left,
            CornerId::BottomRight => &self.corners.bottom_right,
            CornerId::TopRight => &self.corners.top_right,
            CornerId::TopLeft => &self.corners.top_left,
        }
    }

    fn corner_mut(&mut self, id: CornerId) -> &mut Point2<f32> {
        match id {
            CornerId::BottomLeft => &mut self.corners.bottom_left,
            CornerId::BottomRight => &mut self.corners.bottom_right,
            CornerId::TopRight => &mut self.corners.top_right,
            CornerId::TopLeft => &mut self.corners.top_left,
        }
    }
}

/// Pull one off-canvas coordinate back to `[HANDLE_MARGIN, dim - HANDLE_MARGIN]`.
/// The lower bound wins when `dim < 2 * HANDLE_MARGIN`.
fn clamp_axis(value: f32, dim: f32) -> f32 {
    if value < HANDLE_MARGIN {
        HANDLE_MARGIN
    } else if value > dim - HANDLE_MARGIN {
        dim - HANDLE_MARGIN
    } else {
        value
    }
}
