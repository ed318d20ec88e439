//! # Grouping spans by quantized color.
//!
//! One render call is made per distinct color, so a batch of spans is first
//! folded into [`ColorRangeGroup`]s:
//!
//! ```text
//! [red@a, blue@b, red@c, #fe0000@d]  ──►  [red: a, c, d] [blue: b]
//!                                          (0.999 rounds to ff, so d joins red)
//! ```
//!
//! ## Rules
//! - Groups appear in first-seen order of their color.
//! - Ranges keep their input order inside a group.
//! - Every input range lands in exactly one group.

use indexmap::IndexMap;

use super::color::{Color, ColorSpan, Range, Rgb8};

/// Ranges sharing one quantized color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRangeGroup {
    /// First color seen for this group (unquantized).
    pub color: Color,
    /// Quantized key shared by every member.
    pub key: Rgb8,
    /// Ranges in input order.
    pub ranges: Vec<Range>,
}

/// Groups `spans` by quantized color, preserving first-seen order.
pub fn group_by_color(spans: &[ColorSpan]) -> Vec<ColorRangeGroup> {
    let mut groups: IndexMap<Rgb8, ColorRangeGroup> = IndexMap::new();
    for span in spans {
        let key = span.color.quantize();
        groups
            .entry(key)
            .or_insert_with(|| ColorRangeGroup {
                color: span.color,
                key,
                ranges: Vec::new(),
            })
            .ranges
            .push(span.range);
    }
    groups.into_values().collect()
}
