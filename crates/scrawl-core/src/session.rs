//! Pointer-driven mutation of a live document.
//!
//! A [`Session`] owns the document for one drawing surface and consumes
//! the host's pointer stream. Mode switches (draw vs. erase) come from
//! the host, never from pointer events; pointer events only drive
//! transitions within the active mode.

use crate::document::Document;
use crate::eraser::{self, probe_rect};
use crate::stroke::{DrawError, Stroke};
use crate::style::StrokeStyle;
use kurbo::{Point, Rect};
use std::time::Instant;

const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// Kinds of pointer events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
    /// Anything else (hover, button chords, ...). Reported back as
    /// unhandled so the host can route it to underlying UI chrome.
    Other,
}

/// A pointer sample from the host's input source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    /// Index of the touch within a multitouch gesture; the session
    /// treats every down the same way.
    pub pointer: u32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            pointer: 0,
        }
    }
}

/// Active tool mode, toggled by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Draw,
    Erase,
}

/// Rendering collaborator notified whenever the canvas needs painting.
pub trait Repaint {
    /// Schedule a redraw of the canvas.
    fn request_repaint(&mut self);
}

/// Interaction state for one drawing surface.
///
/// Created and torn down by the host; the document is exclusively owned
/// here while gestures are active.
#[derive(Debug)]
pub struct Session<R: Repaint> {
    document: Document,
    repaint: R,
    canvas: Rect,
    mode: ToolMode,
    /// Paint applied to newly begun strokes.
    brush: Option<StrokeStyle>,
    /// Cursor position while a pointer is down; anchors the eraser
    /// overlay.
    probe_center: Option<Point>,
    /// Whether a down-to-up gesture window is open with a live stroke.
    stroke_active: bool,
    last_edit: Option<Instant>,
}

impl<R: Repaint> Session<R> {
    /// Create a session with an empty document.
    pub fn new(repaint: R) -> Self {
        Self {
            document: Document::new(),
            repaint,
            canvas: Rect::new(0.0, 0.0, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            mode: ToolMode::default(),
            brush: None,
            probe_center: None,
            stroke_active: false,
            last_edit: None,
        }
    }

    /// Set the drawable canvas bounds; hit regions clip to these.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = Rect::new(0.0, 0.0, width, height);
    }

    pub fn canvas_bounds(&self) -> Rect {
        self.canvas
    }

    /// Feed one pointer event through the state machine.
    ///
    /// Returns `Ok(true)` when the event was consumed, `Ok(false)` when
    /// the session has no use for it (the host should pass it on).
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<bool, DrawError> {
        match event.kind {
            PointerKind::Down => {
                let at = self.accept_point(event.x, event.y)?;
                self.last_edit = Some(Instant::now());
                self.probe_center = Some(at);
                match self.mode {
                    ToolMode::Erase => {
                        eraser::erase_at(&mut self.document, at, self.canvas);
                    }
                    ToolMode::Draw => {
                        let stroke = Stroke::begin(at.x, at.y)?.with_style(self.brush.clone());
                        self.document.push(stroke);
                        self.stroke_active = true;
                    }
                }
            }
            PointerKind::Move => {
                let at = self.accept_point(event.x, event.y)?;
                self.probe_center = Some(at);
                match self.mode {
                    ToolMode::Erase => {
                        eraser::erase_at(&mut self.document, at, self.canvas);
                    }
                    ToolMode::Draw => {
                        if !self.stroke_active {
                            return Err(DrawError::InvalidState);
                        }
                        if let Some(stroke) = self.document.last_mut() {
                            stroke.extend(at.x, at.y)?;
                        }
                    }
                }
            }
            PointerKind::Up | PointerKind::Cancel => {
                self.last_edit = Some(Instant::now());
                self.probe_center = None;
                self.stroke_active = false;
            }
            PointerKind::Other => return Ok(false),
        }

        self.repaint.request_repaint();
        Ok(true)
    }

    /// Validate coordinates before any mutation; bad input aborts the
    /// open gesture so no uncommitted stroke survives.
    fn accept_point(&mut self, x: f64, y: f64) -> Result<Point, DrawError> {
        if x.is_finite() && y.is_finite() {
            Ok(Point::new(x, y))
        } else {
            self.abort_gesture();
            Err(DrawError::InvalidGeometry { x, y })
        }
    }

    fn abort_gesture(&mut self) {
        if self.stroke_active {
            self.document.pop();
            self.stroke_active = false;
            self.repaint.request_repaint();
        }
        self.probe_center = None;
    }

    /// Switch between drawing and erasing.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if self.mode != mode {
            self.mode = mode;
            self.repaint.request_repaint();
        }
    }

    /// Flip between drawing and erasing.
    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            ToolMode::Draw => ToolMode::Erase,
            ToolMode::Erase => ToolMode::Draw,
        };
        self.set_mode(next);
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Whether the eraser is active, for UI reflection (icon state).
    pub fn is_erasing(&self) -> bool {
        self.mode == ToolMode::Erase
    }

    /// Paint applied to strokes begun from now on.
    pub fn set_brush(&mut self, brush: Option<StrokeStyle>) {
        self.brush = brush;
    }

    /// The eraser-cursor overlay rectangle, when one should be drawn.
    pub fn eraser_overlay(&self) -> Option<Rect> {
        if self.mode == ToolMode::Erase {
            self.probe_center.map(probe_rect)
        } else {
            None
        }
    }

    /// The live document, for rendering and snapshotting.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Replace the document wholesale (the load path). Ends any open
    /// gesture.
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.stroke_active = false;
        self.probe_center = None;
        self.repaint.request_repaint();
    }

    /// Drop every stroke.
    pub fn clear(&mut self) {
        self.document.clear();
        self.stroke_active = false;
        self.repaint.request_repaint();
    }

    /// Timestamp of the most recent committed edit, for dirty tracking.
    pub fn last_edit(&self) -> Option<Instant> {
        self.last_edit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::action::PathAction;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct TestRepaint(Rc<Cell<usize>>);

    impl Repaint for TestRepaint {
        fn request_repaint(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn session() -> (Session<TestRepaint>, TestRepaint) {
        let repaint = TestRepaint::default();
        (Session::new(repaint.clone()), repaint)
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerKind::Down, x, y)
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerKind::Move, x, y)
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerKind::Up, x, y)
    }

    #[test]
    fn test_gesture_produces_single_stroke() {
        let (mut session, _) = session();

        session.handle_pointer(down(10.0, 10.0)).unwrap();
        session.handle_pointer(moved(20.0, 10.0)).unwrap();
        session.handle_pointer(moved(20.0, 20.0)).unwrap();
        session.handle_pointer(up(20.0, 20.0)).unwrap();

        assert_eq!(session.document().len(), 1);
        assert_eq!(
            session.document().strokes()[0].actions(),
            &[
                PathAction::MoveTo { x: 10.0, y: 10.0 },
                PathAction::LineTo { x: 20.0, y: 10.0 },
                PathAction::LineTo { x: 20.0, y: 20.0 },
            ]
        );
    }

    #[test]
    fn test_gesture_round_trips_through_codec() {
        let (mut session, _) = session();

        session.handle_pointer(down(10.0, 10.0)).unwrap();
        session.handle_pointer(moved(20.0, 10.0)).unwrap();
        session.handle_pointer(moved(20.0, 20.0)).unwrap();
        session.handle_pointer(up(20.0, 20.0)).unwrap();

        let bytes = codec::encode(session.document()).unwrap();
        let decoded = codec::decode(&bytes).unwrap();
        assert_eq!(&decoded, session.document());
    }

    #[test]
    fn test_move_without_down_is_invalid_state() {
        let (mut session, _) = session();

        assert_eq!(
            session.handle_pointer(moved(5.0, 5.0)),
            Err(DrawError::InvalidState)
        );
        assert!(session.document().is_empty());

        // Same after a completed gesture.
        session.handle_pointer(down(1.0, 1.0)).unwrap();
        session.handle_pointer(up(1.0, 1.0)).unwrap();
        assert_eq!(
            session.handle_pointer(moved(5.0, 5.0)),
            Err(DrawError::InvalidState)
        );
        assert_eq!(session.document().len(), 1);
    }

    #[test]
    fn test_non_finite_move_aborts_gesture() {
        let (mut session, _) = session();

        session.handle_pointer(down(10.0, 10.0)).unwrap();
        session.handle_pointer(moved(20.0, 10.0)).unwrap();

        let err = session.handle_pointer(moved(f64::NAN, 10.0));
        assert!(matches!(err, Err(DrawError::InvalidGeometry { .. })));

        // The uncommitted stroke is gone and the window is closed.
        assert!(session.document().is_empty());
        assert_eq!(
            session.handle_pointer(moved(30.0, 10.0)),
            Err(DrawError::InvalidState)
        );
    }

    #[test]
    fn test_other_events_are_unhandled() {
        let (mut session, repaint) = session();

        let handled = session
            .handle_pointer(PointerEvent::new(PointerKind::Other, 0.0, 0.0))
            .unwrap();
        assert!(!handled);
        assert!(session.document().is_empty());
        assert_eq!(repaint.0.get(), 0);
    }

    #[test]
    fn test_erase_mode_removes_touched_strokes() {
        let (mut session, _) = session();

        session.handle_pointer(down(50.0, 50.0)).unwrap();
        session.handle_pointer(moved(60.0, 50.0)).unwrap();
        session.handle_pointer(up(60.0, 50.0)).unwrap();
        assert_eq!(session.document().len(), 1);

        session.set_mode(ToolMode::Erase);
        session.handle_pointer(down(55.0, 50.0)).unwrap();
        session.handle_pointer(up(55.0, 50.0)).unwrap();

        assert!(session.document().is_empty());
    }

    #[test]
    fn test_eraser_overlay_tracks_probe() {
        let (mut session, _) = session();
        session.set_mode(ToolMode::Erase);
        assert!(session.eraser_overlay().is_none());

        session.handle_pointer(down(100.0, 100.0)).unwrap();
        let overlay = session.eraser_overlay().unwrap();
        assert_eq!(overlay.center(), Point::new(100.0, 100.0));

        session.handle_pointer(up(100.0, 100.0)).unwrap();
        assert!(session.eraser_overlay().is_none());
    }

    #[test]
    fn test_repaint_scheduled_on_mutation() {
        let (mut session, repaint) = session();

        session.handle_pointer(down(10.0, 10.0)).unwrap();
        let after_down = repaint.0.get();
        assert!(after_down >= 1);

        session.handle_pointer(moved(20.0, 20.0)).unwrap();
        assert!(repaint.0.get() > after_down);
    }

    #[test]
    fn test_last_edit_advances_on_gesture_edges() {
        let (mut session, _) = session();
        assert!(session.last_edit().is_none());

        session.handle_pointer(down(10.0, 10.0)).unwrap();
        let after_down = session.last_edit().unwrap();

        session.handle_pointer(up(10.0, 10.0)).unwrap();
        assert!(session.last_edit().unwrap() >= after_down);
    }

    #[test]
    fn test_toggle_mode() {
        let (mut session, _) = session();
        assert!(!session.is_erasing());
        session.toggle_mode();
        assert!(session.is_erasing());
        session.toggle_mode();
        assert_eq!(session.mode(), ToolMode::Draw);
    }

    #[test]
    fn test_replace_document_closes_gesture() {
        let (mut session, _) = session();
        session.handle_pointer(down(10.0, 10.0)).unwrap();

        session.replace_document(Document::new());
        assert!(session.document().is_empty());
        assert_eq!(
            session.handle_pointer(moved(20.0, 20.0)),
            Err(DrawError::InvalidState)
        );
    }

    #[test]
    fn test_brush_applied_to_new_strokes() {
        let (mut session, _) = session();
        let brush = StrokeStyle::new(Some(6.0), Some("#112233".to_string())).unwrap();
        session.set_brush(Some(brush.clone()));

        session.handle_pointer(down(10.0, 10.0)).unwrap();
        session.handle_pointer(up(10.0, 10.0)).unwrap();

        assert_eq!(session.document().strokes()[0].style(), Some(&brush));
    }
}
