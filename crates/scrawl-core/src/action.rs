//! Path construction actions.
//!
//! A stroke is recorded as an ordered log of these commands; replaying the
//! log rebuilds the stroke's geometry exactly.

use kurbo::{BezPath, Point};

/// Wire tag for a move command.
pub const TAG_MOVE_TO: i64 = 1;
/// Wire tag for a line command.
pub const TAG_LINE_TO: i64 = 2;

/// A single path-construction command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathAction {
    /// Lift the pen and place the cursor at (x, y).
    MoveTo { x: f64, y: f64 },
    /// Draw a segment from the cursor to (x, y).
    LineTo { x: f64, y: f64 },
}

impl PathAction {
    /// The wire tag identifying this variant.
    pub fn tag(&self) -> i64 {
        match self {
            PathAction::MoveTo { .. } => TAG_MOVE_TO,
            PathAction::LineTo { .. } => TAG_LINE_TO,
        }
    }

    /// The command's target coordinates.
    pub fn point(&self) -> Point {
        match *self {
            PathAction::MoveTo { x, y } | PathAction::LineTo { x, y } => Point::new(x, y),
        }
    }

    /// Apply this command to a path under construction.
    ///
    /// The first command applied to an empty path must be `MoveTo`; a
    /// segment needs a prior cursor position.
    pub fn apply_to(&self, path: &mut BezPath) {
        match *self {
            PathAction::MoveTo { x, y } => path.move_to(Point::new(x, y)),
            PathAction::LineTo { x, y } => path.line_to(Point::new(x, y)),
        }
    }
}
