//! Interactive corner-drag editor for detected document quadrilaterals.
//!
//! The editor owns a working copy of a [`scandoc_core::Quad`] and moves its
//! four corners independently inside a bounded canvas, clamping to the
//! canvas edges. It carries no rendering; the presentation layer draws the
//! handles at [`QuadEditor::handle_center`] and forwards pointer events.

mod editor;

pub use editor::{CornerId, QuadEditor, HANDLE_MARGIN};
