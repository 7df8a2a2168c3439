//! A single drawn stroke: an action log with a derived geometric path.
//!
//! The log is the source of truth; the `BezPath` is a cache rebuilt by
//! replaying the log. Both are updated by the same mutation methods and
//! never edited independently.

use crate::action::PathAction;
use crate::style::{ResolvedStyle, StrokeStyle};
use kurbo::{BezPath, Point, Rect};
use thiserror::Error;

/// Errors from gesture-driven stroke construction.
#[derive(Debug, Error, PartialEq)]
pub enum DrawError {
    /// Non-finite coordinates reached a geometry operation.
    #[error("non-finite coordinates ({x}, {y})")]
    InvalidGeometry { x: f64, y: f64 },
    /// A stroke mutation arrived while no gesture was active.
    #[error("no active stroke")]
    InvalidState,
}

/// One continuous pointer gesture rendered as a path.
#[derive(Debug, Clone)]
pub struct Stroke {
    actions: Vec<PathAction>,
    style: Option<StrokeStyle>,
    path: BezPath,
}

/// Geometry is derived from the log, so equality is log + style.
impl PartialEq for Stroke {
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions && self.style == other.style
    }
}

impl Stroke {
    /// Start a stroke at (x, y).
    ///
    /// Rejects non-finite input without constructing anything.
    pub fn begin(x: f64, y: f64) -> Result<Self, DrawError> {
        ensure_finite(x, y)?;
        let mut path = BezPath::new();
        path.move_to(Point::new(x, y));
        Ok(Self {
            actions: vec![PathAction::MoveTo { x, y }],
            style: None,
            path,
        })
    }

    /// Attach a paint descriptor.
    pub fn with_style(mut self, style: Option<StrokeStyle>) -> Self {
        self.style = style;
        self
    }

    /// Append a segment to (x, y).
    ///
    /// Rejects non-finite input before mutating either representation.
    pub fn extend(&mut self, x: f64, y: f64) -> Result<(), DrawError> {
        ensure_finite(x, y)?;
        self.actions.push(PathAction::LineTo { x, y });
        self.path.line_to(Point::new(x, y));
        Ok(())
    }

    /// Rebuild geometry by applying each action in order to an empty path.
    ///
    /// Deterministic: the same log always yields the same path. The log
    /// must start with `MoveTo`.
    pub fn replay(actions: &[PathAction]) -> BezPath {
        let mut path = BezPath::new();
        for action in actions {
            action.apply_to(&mut path);
        }
        path
    }

    /// Reconstruct a stroke from a persisted log.
    ///
    /// The codec validates the log (non-empty, starts with `MoveTo`)
    /// before calling.
    pub(crate) fn from_log(actions: Vec<PathAction>, style: Option<StrokeStyle>) -> Self {
        let path = Self::replay(&actions);
        Self {
            actions,
            style,
            path,
        }
    }

    /// The construction log, in application order.
    pub fn actions(&self) -> &[PathAction] {
        &self.actions
    }

    /// The paint overrides, if any.
    pub fn style(&self) -> Option<&StrokeStyle> {
        self.style.as_ref()
    }

    /// The paint to render with, after falling back to defaults.
    pub fn resolved_style(&self) -> ResolvedStyle {
        self.style
            .as_ref()
            .map(StrokeStyle::resolve)
            .unwrap_or_default()
    }

    /// The derived geometry.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Bounding box of the stroke's points.
    pub fn bounds(&self) -> Rect {
        if self.actions.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for action in &self.actions {
            let point = action.point();
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Whether this stroke's geometry, clipped to the canvas bounds,
    /// overlaps the probe rectangle.
    ///
    /// A bounding-box disjoint test rejects far-away strokes before the
    /// segment walk.
    pub fn hit_region_against(&self, probe: Rect, canvas: Rect) -> bool {
        if !rects_overlap(self.bounds(), probe) {
            return false;
        }

        // Anything outside the canvas is not part of the drawn region, so
        // clipping the probe to the canvas is equivalent to clipping the
        // stroke's region.
        let clipped = Rect::new(
            probe.x0.max(canvas.x0),
            probe.y0.max(canvas.y0),
            probe.x1.min(canvas.x1),
            probe.y1.min(canvas.y1),
        );
        if clipped.x0 > clipped.x1 || clipped.y0 > clipped.y1 {
            return false;
        }

        let mut cursor = Point::ZERO;
        let mut started = false;
        let mut subpath_has_segment = false;

        for action in &self.actions {
            match *action {
                PathAction::MoveTo { x, y } => {
                    // A subpath that was only a MoveTo is a drawn point.
                    if started && !subpath_has_segment && rect_contains(clipped, cursor) {
                        return true;
                    }
                    cursor = Point::new(x, y);
                    started = true;
                    subpath_has_segment = false;
                }
                PathAction::LineTo { x, y } => {
                    let next = Point::new(x, y);
                    if segment_hits_rect(cursor, next, clipped) {
                        return true;
                    }
                    cursor = next;
                    subpath_has_segment = true;
                }
            }
        }

        started && !subpath_has_segment && rect_contains(clipped, cursor)
    }
}

fn ensure_finite(x: f64, y: f64) -> Result<(), DrawError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(DrawError::InvalidGeometry { x, y })
    }
}

/// Closed-interval rectangle overlap; handles degenerate (point) rects.
fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Closed-interval point containment.
fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Test if the segment a-b touches the rectangle.
fn segment_hits_rect(a: Point, b: Point, rect: Rect) -> bool {
    if rect_contains(rect, a) || rect_contains(rect, b) {
        return true;
    }
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let edges = [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ];
    edges
        .iter()
        .any(|&(c, d)| segments_intersect(a, b, c, d))
}

/// Test if two line segments (a-b) and (c-d) intersect.
fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let cross = |o: Point, p: Point, q: Point| -> f64 {
        (p.x - o.x) * (q.y - o.y) - (p.y - o.y) * (q.x - o.x)
    };
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear cases: check if an endpoint lies on the other segment
    let on_segment = |p: Point, q: Point, r: Point| -> bool {
        r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
    };
    (d1.abs() < 1e-10 && on_segment(c, d, a))
        || (d2.abs() < 1e-10 && on_segment(c, d, b))
        || (d3.abs() < 1e-10 && on_segment(a, b, c))
        || (d4.abs() < 1e-10 && on_segment(a, b, d))
}
