//! # Single-flight guard around a [`Highlighter`].
//!
//! Only one pass runs per document. A new pass supersedes the one in flight:
//!
//! ```text
//! highlight(B) ──► swap token ──► cancel(token A) ──► lock ──► run B
//!                                      │
//!                   pass A ◄───────────┘  stops at next batch boundary,
//!                                         closes its scope, returns Superseded
//! ```
//!
//! ## Rules
//! - At most one pass touches the host at a time for a given document.
//! - A pass superseded while waiting for the lock returns `Superseded` without any host call.
//! - The latest call always runs (unless the slot is disposed).

use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::color::ColorSpan;
use super::highlighter::{HighlightReport, Highlighter};
use crate::error::HighlightError;

/// Serializes passes over one [`Highlighter`].
pub struct HighlightSlot {
    inner: Mutex<Highlighter>,
    current: SyncMutex<CancellationToken>,
}

impl HighlightSlot {
    pub fn new(highlighter: Highlighter) -> Self {
        Self {
            inner: Mutex::new(highlighter),
            current: SyncMutex::new(CancellationToken::new()),
        }
    }

    /// Runs a pass, superseding any pass still in flight.
    pub async fn highlight(&self, spans: &[ColorSpan]) -> Result<HighlightReport, HighlightError> {
        let token = CancellationToken::new();
        let previous = std::mem::replace(&mut *self.current.lock(), token.clone());
        previous.cancel();

        let mut hl = self.inner.lock().await;
        if token.is_cancelled() {
            tracing::debug!("highlight.superseded_before_start");
            return Ok(HighlightReport::superseded());
        }
        hl.highlight_until(spans, &token).await
    }

    /// Clears every rendered region once the pass in flight (if any) is done.
    pub async fn clear_highlight(&self) -> Result<(), HighlightError> {
        self.inner.lock().await.clear_highlight().await
    }

    /// Spans currently rendered.
    pub async fn colors(&self) -> Vec<ColorSpan> {
        self.inner.lock().await.colors().to_vec()
    }

    pub async fn has_color(&self) -> bool {
        self.inner.lock().await.has_color()
    }

    pub async fn is_disposed(&self) -> bool {
        self.inner.lock().await.is_disposed()
    }

    /// Stops the pass in flight and disposes the highlighter.
    pub async fn dispose(&self) {
        self.current.lock().cancel();
        self.inner.lock().await.dispose().await;
    }
}
