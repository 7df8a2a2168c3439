//! Stroke paint descriptors.

use peniko::Color;
use thiserror::Error;

/// Stroke width used when a stroke carries no explicit width.
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

/// Errors from paint construction.
#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    #[error("stroke width must be a finite positive number, got {0}")]
    InvalidWidth(f64),
    #[error("color must match #RRGGBB, got {0:?}")]
    InvalidColor(String),
}

/// Optional paint overrides attached to a stroke.
///
/// Immutable once constructed. An absent field means "use the default
/// paint" at render time, not "draw nothing".
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    stroke_width: Option<f64>,
    color_hex: Option<String>,
}

impl StrokeStyle {
    /// Build a validated paint descriptor.
    ///
    /// A present width must be finite and positive; a present color must
    /// match `#RRGGBB`.
    pub fn new(stroke_width: Option<f64>, color_hex: Option<String>) -> Result<Self, StyleError> {
        if let Some(width) = stroke_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(StyleError::InvalidWidth(width));
            }
        }
        if let Some(ref hex) = color_hex {
            parse_color_hex(hex)?;
        }
        Ok(Self {
            stroke_width,
            color_hex,
        })
    }

    pub fn stroke_width(&self) -> Option<f64> {
        self.stroke_width
    }

    pub fn color_hex(&self) -> Option<&str> {
        self.color_hex.as_deref()
    }

    /// Resolve against the default paint.
    pub fn resolve(&self) -> ResolvedStyle {
        let fallback = ResolvedStyle::default();
        ResolvedStyle {
            width: self.stroke_width.unwrap_or(fallback.width),
            color: self
                .color_hex
                .as_deref()
                .and_then(|hex| parse_color_hex(hex).ok())
                .unwrap_or(fallback.color),
        }
    }
}

/// Concrete paint handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub width: f64,
    pub color: Color,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_STROKE_WIDTH,
            color: Color::from_rgba8(0, 0, 0, 255),
        }
    }
}

/// Parse a `#RRGGBB` string into an opaque color.
pub fn parse_color_hex(hex: &str) -> Result<Color, StyleError> {
    let invalid = || StyleError::InvalidColor(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let r = u8::from_str_radix(&digits[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&digits[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&digits[4..6], 16).unwrap_or(0);
    Ok(Color::from_rgba8(r, g, b, 255))
}
