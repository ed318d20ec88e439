//! Color highlighting: turns detected color literals into host display regions.
//!
//! ## Contents
//! - [`Color`], [`Rgb8`], [`Range`], [`ColorSpan`] value types and the contrast rule
//! - [`group_by_color`] folds a batch into one [`ColorRangeGroup`] per quantized color
//! - [`StyleRegistry`] shared record of `BG<hex>` styles known to the host
//! - [`Document`], [`Renderer`] host capabilities
//! - [`Highlighter`] one document's paced, clear-then-render pass
//! - [`HighlightSlot`] single-flight guard (a newer pass supersedes the running one)
//! - [`Highlighters`] per-buffer registry, cleaned up on `BufUnload`

mod color;
mod group;
mod highlighter;
mod host;
mod registry;
mod slot;
mod styles;

#[cfg(test)]
pub(crate) mod testing;

pub use color::{Color, ColorSpan, DARK_LUMINANCE_THRESHOLD, Position, Range, Rgb8};
pub use group::{ColorRangeGroup, group_by_color};
pub use highlighter::{HighlightReport, Highlighter, Outcome};
pub use host::{ClearTarget, Document, MatchId, Renderer, SourceId};
pub use registry::Highlighters;
pub use slot::HighlightSlot;
pub use styles::{StyleRegistry, batch_command, style_command, style_name};
