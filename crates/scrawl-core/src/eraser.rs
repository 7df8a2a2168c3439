//! Region-based stroke erasure.
//!
//! The eraser is all-or-nothing per stroke: any stroke whose drawn region
//! overlaps the probe is removed whole.

use crate::document::Document;
use kurbo::{Point, Rect};

/// Side length of the square eraser probe, in canvas units.
pub const ERASER_SIZE: f64 = 26.0;

/// The square probe region centered on the eraser cursor.
pub fn probe_rect(center: Point) -> Rect {
    let half = ERASER_SIZE / 2.0;
    Rect::new(
        center.x - half,
        center.y - half,
        center.x + half,
        center.y + half,
    )
}

/// Remove every stroke whose region, clipped to `canvas`, overlaps the
/// probe at `center`.
///
/// All strokes are examined and matches are removed in a single batch, so
/// survivors keep their relative paint order. Returns whether anything
/// was removed, letting the caller decide on a redraw.
pub fn erase_at(document: &mut Document, center: Point, canvas: Rect) -> bool {
    let probe = probe_rect(center);
    document.retain_strokes(|stroke| !stroke.hit_region_against(probe, canvas))
}
