//! # Highlighter configuration.
//!
//! Provides [`HighlightConfig`], the settings shared by every
//! [`Highlighter`](crate::Highlighter) created through a
//! [`Highlighters`](crate::Highlighters) registry.
//!
//! ## Sentinel values
//! - `batch_size = 0` → treated as 1 (see [`HighlightConfig::batch_size_clamped`])
//! - `batch_delay = 0s` → batches are sent back to back

use std::time::Duration;

use crate::highlight::SourceId;

/// How previously rendered highlights are removed from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearStrategy {
    /// The host tracks regions globally by handle (Vim matches): the highlighter
    /// remembers every returned [`MatchId`](crate::MatchId) and clears exactly those.
    MatchIds,
    /// The host groups regions under a per-instance source id (Neovim namespaces):
    /// the highlighter clears by [`SourceId`] and keeps no handles.
    #[default]
    SourceId,
}

/// Settings for color highlighting.
///
/// ## Field semantics
/// - `batch_size`: spans dispatched to the host per buffered scope (min 1)
/// - `batch_delay`: pause between two consecutive batches
/// - `clear_strategy`: how old regions are removed, see [`ClearStrategy`]
/// - `source_id`: source id passed to the document with every render call
#[derive(Clone, Debug)]
pub struct HighlightConfig {
    /// Number of spans rendered inside one buffered-command scope.
    pub batch_size: usize,

    /// Pause between batches, so the host UI stays responsive while a buffer
    /// with thousands of color literals is recolored.
    ///
    /// There is no pause after the last batch.
    pub batch_delay: Duration,

    /// How previously rendered regions are cleared.
    pub clear_strategy: ClearStrategy,

    /// Source id handed to [`Document::highlight_ranges`](crate::Document::highlight_ranges).
    pub source_id: SourceId,
}

impl HighlightConfig {
    /// Returns the batch size clamped to a minimum of 1.
    #[inline]
    pub fn batch_size_clamped(&self) -> usize {
        self.batch_size.max(1)
    }

    /// Returns the inter-batch pause as an `Option`.
    ///
    /// - `None` → no pause
    /// - `Some(d)` → sleep `d` between batches
    #[inline]
    pub fn pacing(&self) -> Option<Duration> {
        if self.batch_delay == Duration::ZERO {
            None
        } else {
            Some(self.batch_delay)
        }
    }

    /// Number of batches a list of `spans` spans is split into.
    #[inline]
    pub fn batch_count(&self, spans: usize) -> usize {
        spans.div_ceil(self.batch_size_clamped())
    }
}

impl Default for HighlightConfig {
    /// Default configuration:
    ///
    /// - `batch_size = 100`
    /// - `batch_delay = 50ms`
    /// - `clear_strategy = ClearStrategy::SourceId`
    /// - `source_id = SourceId(0)`
    fn default() -> Self {
        Self {
            batch_size: 100,
            batch_delay: Duration::from_millis(50),
            clear_strategy: ClearStrategy::default(),
            source_id: SourceId(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = HighlightConfig::default();
        assert_eq!(cfg.batch_size, 100);
        assert_eq!(cfg.pacing(), Some(Duration::from_millis(50)));
        assert_eq!(cfg.clear_strategy, ClearStrategy::SourceId);
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let cfg = HighlightConfig {
            batch_size: 0,
            batch_delay: Duration::ZERO,
            ..HighlightConfig::default()
        };
        assert_eq!(cfg.batch_size_clamped(), 1);
        assert_eq!(cfg.pacing(), None);
        assert_eq!(cfg.batch_count(3), 3);
    }

    #[test]
    fn batch_count_rounds_up() {
        let cfg = HighlightConfig::default();
        assert_eq!(cfg.batch_count(0), 0);
        assert_eq!(cfg.batch_count(100), 1);
        assert_eq!(cfg.batch_count(250), 3);
    }
}
