//! Detected quad -> display space -> interactive correction -> back to
//! detector space, the way a review screen wires the pieces together.

use nalgebra::Point2;
use scandoc::{CornerId, DisplayBounds, ImageSize, Quad, QuadEditor, ViewTransform};

#[test]
fn corrected_corners_map_back_to_detector_space() {
    let image = ImageSize::new(640.0, 480.0);
    let display = DisplayBounds::new(320.0, 568.0);
    let transform = ViewTransform::new(image, display).unwrap();

    let detected = Quad::new(
        Point2::new(60.0, 60.0),
        Point2::new(580.0, 70.0),
        Point2::new(570.0, 410.0),
        Point2::new(55.0, 400.0),
    );

    let mut editor = QuadEditor::new(display, transform.to_display(&detected));
    assert!(!editor.moved());

    // nudge the top-left handle a little on screen
    let handle = editor.handle_center(CornerId::TopLeft);
    editor.begin_drag(CornerId::TopLeft, handle);
    editor.update_drag(CornerId::TopLeft, handle + nalgebra::Vector2::new(6.0, -4.0));
    editor.end_drag(CornerId::TopLeft);
    assert!(editor.moved());

    let corrected = transform.to_detector(&editor.corners());

    // untouched corners survive the round trip
    let eps = 0.05;
    assert!((corrected.top_right.x - detected.top_right.x).abs() < eps);
    assert!((corrected.top_right.y - detected.top_right.y).abs() < eps);
    assert!((corrected.bottom_left.x - detected.bottom_left.x).abs() < eps);
    assert!((corrected.bottom_left.y - detected.bottom_left.y).abs() < eps);

    // the dragged corner actually moved in detector space
    let delta = corrected.top_left - detected.top_left;
    assert!(delta.norm() > 1.0);
}
