//! # Host capabilities consumed by the highlighter.
//!
//! The editor is external. The highlighter only sees two seams:
//!
//! ```text
//! Highlighter ──► Renderer  pause_notification / resume_notification (buffered scope)
//!             │             command(text, silent)                  (style registration)
//!             └─► Document  version / highlight_ranges / clear_match_ids
//! ```
//!
//! Both traits are object safe and used as `Arc<dyn ...>`.

use async_trait::async_trait;

use super::color::Range;
use crate::error::HostError;

/// Handle of one region created by the host (a Vim match id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(pub i64);

/// Per-instance source identifier the host groups regions under (a Neovim namespace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceId(pub i64);

/// What [`Document::clear_match_ids`] should remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget<'a> {
    /// Exactly these region handles.
    Matches(&'a [MatchId]),
    /// Every region created under this source id.
    Source(SourceId),
}

/// A document the highlighter decorates.
#[async_trait]
pub trait Document: Send + Sync + 'static {
    /// Current content version; increases on every edit.
    fn version(&self) -> i64;

    /// Renders `ranges` under `style`, returning the handles of the new regions.
    ///
    /// Hosts that clear by source id may return an empty list.
    async fn highlight_ranges(
        &self,
        ranges: &[Range],
        style: &str,
        source: SourceId,
    ) -> Result<Vec<MatchId>, HostError>;

    /// Removes previously rendered regions.
    async fn clear_match_ids(&self, target: ClearTarget<'_>) -> Result<(), HostError>;
}

/// Buffered command channel to the host.
#[async_trait]
pub trait Renderer: Send + Sync + 'static {
    /// Opens a buffered scope: following host calls are queued, not sent.
    fn pause_notification(&self);

    /// Closes the buffered scope and flushes the queued calls.
    async fn resume_notification(&self) -> Result<(), HostError>;

    /// Executes a host command.
    async fn command(&self, text: &str, silent: bool) -> Result<(), HostError>;
}
