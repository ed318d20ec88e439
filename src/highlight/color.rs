//! # Colors, ranges and spans.
//!
//! A [`ColorSpan`] is one detected color literal: a [`Color`] with components in
//! `[0, 1]` and the [`Range`] it occupies. Colors are compared after quantizing
//! each component to 8 bits ([`Rgb8`]); the quantized value names the display
//! style and decides the foreground used on top of it.
//!
//! ## Contrast rule
//! ```text
//! luminance = 0.2126·r + 0.7152·g + 0.0722·b     (r, g, b in 0..=255)
//! luminance < 40  → white foreground
//! otherwise       → black foreground
//! ```

use std::fmt;

/// Luminance below which a background counts as dark.
pub const DARK_LUMINANCE_THRESHOLD: f64 = 40.0;

const LUMA_RED: f64 = 0.2126;
const LUMA_GREEN: f64 = 0.7152;
const LUMA_BLUE: f64 = 0.0722;

/// Color with components in `[0, 1]`, as reported by a color provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    /// Opaque color from `[0, 1]` components.
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Quantizes each component to the nearest of 255 levels.
    ///
    /// Out-of-range components are clamped first.
    pub fn quantize(&self) -> Rgb8 {
        Rgb8 {
            r: to_u8(self.red),
            g: to_u8(self.green),
            b: to_u8(self.blue),
        }
    }
}

fn to_u8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// 8-bit quantized color; the identity used for grouping and style names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase 6-digit hex, e.g. `"00ff7f"`.
    pub fn hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance on the 0..=255 scale.
    pub fn luminance(&self) -> f64 {
        LUMA_RED * f64::from(self.r)
            + LUMA_GREEN * f64::from(self.g)
            + LUMA_BLUE * f64::from(self.b)
    }

    #[inline]
    pub fn is_dark(&self) -> bool {
        self.luminance() < DARK_LUMINANCE_THRESHOLD
    }

    /// Foreground drawn on top of this background: white on dark, black otherwise.
    pub fn foreground(&self) -> Rgb8 {
        if self.is_dark() {
            Rgb8::WHITE
        } else {
            Rgb8::BLACK
        }
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

impl From<Color> for Rgb8 {
    fn from(c: Color) -> Self {
        c.quantize()
    }
}

/// Zero-based position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open range `[start, end)` in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }
}

/// One detected color literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSpan {
    pub color: Color,
    pub range: Range,
}

impl ColorSpan {
    pub const fn new(color: Color, range: Range) -> Self {
        Self { color, range }
    }
}
