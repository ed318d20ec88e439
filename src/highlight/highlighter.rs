//! # Per-document color highlighter.
//!
//! A [`Highlighter`] replaces the set of color regions rendered on one document.
//! Every pass clears first, then renders in paced batches:
//!
//! ```text
//! highlight(spans)
//!   ├─► version = document.version()
//!   ├─► clear (by MatchIds or by SourceId)
//!   └─► for batch in spans.chunks(batch_size):
//!         ├─► [pacing delay | cancelled → Superseded]   (not before the first batch)
//!         ├─► pause_notification()
//!         ├─► group_by_color(batch)
//!         ├─► command("hi BG.. | hi BG..", silent)       (only unregistered styles)
//!         ├─► highlight_ranges(group.ranges, "BG<hex>")  (one call per group)
//!         └─► resume_notification()
//!   colors = rendered spans; version changed meanwhile → Stale
//! ```
//!
//! ## Rules
//! - Clearing always happens before anything is added, and always empties `colors`.
//! - A buffered scope opened by a batch is closed before the batch's result is returned,
//!   including on error. A scope left open by a dropped future is closed by the next pass
//!   or by [`Highlighter::dispose`].
//! - Host errors propagate; regions created before the failure stay tracked so the next
//!   pass clears them, and `colors` keeps the spans of every group that did render.
//! - `Disposed` is terminal.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::color::{ColorSpan, Rgb8};
use super::group::group_by_color;
use super::host::{ClearTarget, Document, MatchId, Renderer};
use super::styles::{StyleRegistry, batch_command, style_name};
use crate::config::{ClearStrategy, HighlightConfig};
use crate::error::HighlightError;

/// How a highlight pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every batch was rendered against the version it started from.
    Applied,
    /// Every batch was rendered, but the document was edited meanwhile.
    Stale,
    /// A newer pass took over; rendering stopped at a batch boundary.
    Superseded,
}

/// Summary of one highlight pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightReport {
    /// Document version recorded when the pass started.
    pub version: Option<i64>,
    /// Batches rendered.
    pub batches: usize,
    /// Spans rendered.
    pub spans: usize,
    /// New styles registered on the host.
    pub styles_registered: usize,
    /// Ranges handed to the document.
    pub regions: usize,
    /// How the pass ended.
    pub outcome: Outcome,
}

impl HighlightReport {
    fn started(version: Option<i64>) -> Self {
        Self {
            version,
            batches: 0,
            spans: 0,
            styles_registered: 0,
            regions: 0,
            outcome: Outcome::Applied,
        }
    }

    pub(crate) fn superseded() -> Self {
        Self {
            outcome: Outcome::Superseded,
            ..Self::started(None)
        }
    }
}

#[derive(Default)]
struct Rendered {
    version: Option<i64>,
    colors: Vec<ColorSpan>,
    match_ids: Vec<MatchId>,
}

/// Color highlighter bound to one document.
pub struct Highlighter {
    document: Option<Arc<dyn Document>>,
    renderer: Arc<dyn Renderer>,
    styles: Arc<StyleRegistry>,
    cfg: HighlightConfig,
    state: Rendered,
    scope_open: bool,
}

impl Highlighter {
    /// Creates a highlighter for `document`.
    ///
    /// `styles` should be shared by every highlighter talking to the same host.
    pub fn new(
        document: Arc<dyn Document>,
        renderer: Arc<dyn Renderer>,
        styles: Arc<StyleRegistry>,
        cfg: HighlightConfig,
    ) -> Self {
        Self {
            document: Some(document),
            renderer,
            styles,
            cfg,
            state: Rendered::default(),
            scope_open: false,
        }
    }

    /// Replaces the rendered regions with the ones derived from `spans`.
    pub async fn highlight(&mut self, spans: &[ColorSpan]) -> Result<HighlightReport, HighlightError> {
        self.highlight_until(spans, &CancellationToken::new()).await
    }

    /// Same as [`highlight`](Self::highlight), but stops at the next batch boundary
    /// once `cancel` fires.
    pub async fn highlight_until(
        &mut self,
        spans: &[ColorSpan],
        cancel: &CancellationToken,
    ) -> Result<HighlightReport, HighlightError> {
        let document = self.document.clone().ok_or(HighlightError::Disposed)?;
        if self.scope_open {
            tracing::warn!("highlight.scope_left_open");
            self.close_scope().await?;
        }

        let version = document.version();
        self.state.version = Some(version);
        self.clear_with(&document).await?;

        let mut report = HighlightReport::started(Some(version));
        if spans.is_empty() {
            return Ok(report);
        }

        let size = self.cfg.batch_size_clamped();
        tracing::trace!(
            version,
            spans = spans.len(),
            batches = self.cfg.batch_count(spans.len()),
            "highlight.start"
        );
        for (index, batch) in spans.chunks(size).enumerate() {
            if index > 0 && !self.pace(cancel).await {
                report.outcome = Outcome::Superseded;
                break;
            }
            let mut rendered: Vec<Rgb8> = Vec::new();
            if let Err(err) = self
                .render_batch(&document, batch, &mut report, &mut rendered)
                .await
            {
                let mut colors = spans[..report.spans].to_vec();
                colors.extend(
                    batch
                        .iter()
                        .filter(|span| rendered.contains(&span.color.quantize())),
                );
                self.state.colors = colors;
                tracing::warn!(
                    version,
                    batch = index,
                    label = err.as_label(),
                    error = %err,
                    "highlight.failed"
                );
                return Err(err);
            }
        }
        self.state.colors = spans[..report.spans].to_vec();

        if report.outcome == Outcome::Applied {
            let now = document.version();
            if now != version {
                report.outcome = Outcome::Stale;
                tracing::debug!(version, now, "highlight.stale");
            }
        }

        tracing::debug!(
            version,
            batches = report.batches,
            spans = report.spans,
            styles = report.styles_registered,
            outcome = ?report.outcome,
            "highlight.done"
        );
        Ok(report)
    }

    /// Removes every rendered region and empties the color list.
    pub async fn clear_highlight(&mut self) -> Result<(), HighlightError> {
        let document = self.document.clone().ok_or(HighlightError::Disposed)?;
        self.clear_with(&document).await
    }

    /// Spans currently rendered.
    pub fn colors(&self) -> &[ColorSpan] {
        &self.state.colors
    }

    /// True if at least one span is rendered.
    #[inline]
    pub fn has_color(&self) -> bool {
        !self.state.colors.is_empty()
    }

    /// Document version recorded by the last pass.
    pub fn version(&self) -> Option<i64> {
        self.state.version
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.document.is_none()
    }

    /// Closes a buffered scope left open and detaches from the document.
    ///
    /// Regions already rendered are left to the host. Repeated calls are no-ops.
    pub async fn dispose(&mut self) {
        if self.scope_open {
            tracing::warn!("highlight.scope_left_open");
        }
        if let Err(err) = self.close_scope().await {
            tracing::warn!(error = %err, "highlight.dispose_resume_failed");
        }
        if self.document.take().is_some() {
            self.state = Rendered::default();
            tracing::debug!("highlight.disposed");
        }
    }

    async fn clear_with(&mut self, document: &Arc<dyn Document>) -> Result<(), HighlightError> {
        self.state.colors.clear();
        match self.cfg.clear_strategy {
            ClearStrategy::MatchIds => {
                let ids = std::mem::take(&mut self.state.match_ids);
                if ids.is_empty() {
                    return Ok(());
                }
                if let Err(err) = document.clear_match_ids(ClearTarget::Matches(&ids)).await {
                    self.state.match_ids = ids;
                    return Err(HighlightError::host("clear", err));
                }
                Ok(())
            }
            ClearStrategy::SourceId => document
                .clear_match_ids(ClearTarget::Source(self.cfg.source_id))
                .await
                .map_err(|e| HighlightError::host("clear", e)),
        }
    }

    /// Waits out the pacing delay. Returns `false` if `cancel` fired first.
    async fn pace(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        let Some(delay) = self.cfg.pacing() else {
            return true;
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    async fn render_batch(
        &mut self,
        document: &Arc<dyn Document>,
        batch: &[ColorSpan],
        report: &mut HighlightReport,
        rendered: &mut Vec<Rgb8>,
    ) -> Result<(), HighlightError> {
        self.renderer.pause_notification();
        self.scope_open = true;

        let filled = self.fill_batch(document, batch, report, rendered).await;
        let closed = self.close_scope().await;
        filled?;
        closed?;

        report.batches += 1;
        report.spans += batch.len();
        tracing::trace!(batch = report.batches, spans = batch.len(), "highlight.batch");
        Ok(())
    }

    async fn fill_batch(
        &mut self,
        document: &Arc<dyn Document>,
        batch: &[ColorSpan],
        report: &mut HighlightReport,
        rendered: &mut Vec<Rgb8>,
    ) -> Result<(), HighlightError> {
        let groups = group_by_color(batch);

        let fresh = self.styles.unregistered(groups.iter().map(|g| g.key));
        if !fresh.is_empty() {
            self.renderer
                .command(&batch_command(&fresh), true)
                .await
                .map_err(|e| HighlightError::host("register_styles", e))?;
            self.styles.mark_registered(&fresh);
            report.styles_registered += fresh.len();
        }

        for group in &groups {
            let ids = document
                .highlight_ranges(&group.ranges, &style_name(group.key), self.cfg.source_id)
                .await
                .map_err(|e| HighlightError::host("render", e))?;
            report.regions += group.ranges.len();
            rendered.push(group.key);
            if self.cfg.clear_strategy == ClearStrategy::MatchIds {
                self.state.match_ids.extend(ids);
            }
        }
        Ok(())
    }

    async fn close_scope(&mut self) -> Result<(), HighlightError> {
        if !self.scope_open {
            return Ok(());
        }
        self.scope_open = false;
        self.renderer
            .resume_notification()
            .await
            .map_err(|e| HighlightError::host("resume", e))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::highlight::color::{Color, Range};
    use crate::highlight::testing::{Call, FakeHost};

    fn span(r: f64, g: f64, b: f64, line: u32) -> ColorSpan {
        ColorSpan::new(Color::rgb(r, g, b), Range::new(line, 0, line, 7))
    }

    fn highlighter(host: &Arc<FakeHost>, cfg: HighlightConfig) -> (Highlighter, Arc<StyleRegistry>) {
        let styles = Arc::new(StyleRegistry::new());
        let hl = Highlighter::new(host.clone(), host.clone(), styles.clone(), cfg);
        (hl, styles)
    }

    fn match_ids_cfg() -> HighlightConfig {
        HighlightConfig {
            clear_strategy: ClearStrategy::MatchIds,
            ..HighlightConfig::default()
        }
    }

    #[tokio::test]
    async fn two_colors_register_two_styles_once() {
        let host = FakeHost::new();
        let (mut hl, styles) = highlighter(&host, HighlightConfig::default());
        let spans = [span(1.0, 0.0, 0.0, 0), span(1.0, 0.0, 0.0, 1), span(0.0, 0.0, 0.5, 2)];

        let first = hl.highlight(&spans).await.unwrap();
        assert_eq!(first.styles_registered, 2);
        assert_eq!(styles.len(), 2);
        assert_eq!(
            host.commands(),
            vec!["hi BGff0000 guibg=#ff0000 guifg=#000000|hi BG000080 guibg=#000080 guifg=#ffffff"]
        );
        assert_eq!(host.count(|c| matches!(c, Call::Command { silent: true, .. })), 1);

        let second = hl.highlight(&spans).await.unwrap();
        assert_eq!(second.styles_registered, 0);
        assert_eq!(host.commands().len(), 1);
        assert_eq!(second.outcome, Outcome::Applied);
    }

    #[tokio::test]
    async fn one_render_call_per_color_group() {
        let host = FakeHost::new();
        let (mut hl, _) = highlighter(&host, HighlightConfig::default());
        let spans = [span(1.0, 0.0, 0.0, 0), span(0.0, 1.0, 0.0, 1), span(1.0, 0.0, 0.0, 2)];

        hl.highlight(&spans).await.unwrap();

        let calls = host.calls();
        assert_eq!(calls.first(), Some(&Call::ClearSource(HighlightConfig::default().source_id)));
        let renders: Vec<_> = calls
            .iter()
            .filter(|c| matches!(c, Call::Render { .. }))
            .cloned()
            .collect();
        assert_eq!(
            renders,
            vec![
                Call::Render { style: "BGff0000".into(), ranges: 2 },
                Call::Render { style: "BG00ff00".into(), ranges: 1 },
            ]
        );
        assert_eq!(calls.last(), Some(&Call::Resume));
    }

    #[tokio::test]
    async fn empty_spans_clear_previous_regions() {
        let host = FakeHost::new();
        let (mut hl, _) = highlighter(&host, match_ids_cfg());

        hl.highlight(&[span(0.2, 0.4, 0.6, 0), span(0.2, 0.4, 0.6, 3)]).await.unwrap();
        assert!(hl.has_color());
        host.take_calls();

        let report = hl.highlight(&[]).await.unwrap();
        assert_eq!(report.batches, 0);
        assert!(!hl.has_color());
        assert!(hl.colors().is_empty());
        assert_eq!(host.take_calls(), vec![Call::ClearMatches(vec![MatchId(1), MatchId(2)])]);

        // nothing left to clear
        hl.highlight(&[]).await.unwrap();
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn source_id_strategy_tracks_no_handles() {
        let host = FakeHost::new();
        let cfg = HighlightConfig {
            source_id: crate::highlight::SourceId(7),
            ..HighlightConfig::default()
        };
        let (mut hl, _) = highlighter(&host, cfg);

        hl.highlight(&[span(0.2, 0.4, 0.6, 0)]).await.unwrap();
        hl.clear_highlight().await.unwrap();

        assert!(!hl.has_color());
        assert_eq!(
            host.count(|c| *c == Call::ClearSource(crate::highlight::SourceId(7))),
            2
        );
        assert_eq!(host.count(|c| matches!(c, Call::ClearMatches(_))), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn large_input_is_batched_with_pacing_between() {
        let host = FakeHost::new();
        let (mut hl, _) = highlighter(&host, HighlightConfig::default());
        let spans: Vec<ColorSpan> = (0..250).map(|i| span(0.1, 0.2, 0.3, i)).collect();

        let started = tokio::time::Instant::now();
        let report = hl.highlight(&spans).await.unwrap();

        assert_eq!(report.batches, 3);
        assert_eq!(report.spans, 250);
        assert_eq!(started.elapsed(), Duration::from_millis(100));
        assert_eq!(host.count(|c| *c == Call::Pause), 3);
        assert_eq!(host.count(|c| *c == Call::Resume), 3);
        let sizes: Vec<usize> = host
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::Render { ranges, .. } => Some(*ranges),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(hl.colors().len(), 250);
    }

    #[tokio::test]
    async fn render_failure_closes_scope_and_propagates() {
        let host = FakeHost::new();
        let (mut hl, styles) = highlighter(&host, match_ids_cfg());
        host.fail_render(true);

        let err = hl.highlight(&[span(1.0, 1.0, 0.0, 0)]).await.unwrap_err();
        assert!(matches!(err, HighlightError::Host { stage: "render", .. }));
        assert_eq!(host.calls().last(), Some(&Call::Resume));
        // the style command went through, so the style stays registered
        assert_eq!(styles.len(), 1);
        assert!(!hl.has_color());

        host.fail_render(false);
        let report = hl.highlight(&[span(1.0, 1.0, 0.0, 0)]).await.unwrap();
        assert_eq!(report.styles_registered, 0);
        assert!(hl.has_color());
    }

    #[tokio::test]
    async fn groups_rendered_before_a_failure_stay_in_colors() {
        let host = FakeHost::new();
        let (mut hl, _) = highlighter(&host, match_ids_cfg());
        host.fail_render_at(1);
        let red = span(1.0, 0.0, 0.0, 0);
        let blue = span(0.0, 0.0, 1.0, 1);

        let err = hl.highlight(&[red, blue]).await.unwrap_err();
        assert!(matches!(err, HighlightError::Host { stage: "render", .. }));
        assert!(hl.has_color());
        assert_eq!(hl.colors(), &[red]);
        assert_eq!(host.calls().last(), Some(&Call::Resume));

        host.take_calls();
        hl.highlight(&[]).await.unwrap();
        assert!(!hl.has_color());
        assert_eq!(host.calls(), vec![Call::ClearMatches(vec![MatchId(1)])]);
    }

    #[tokio::test]
    async fn failed_clear_keeps_handles_for_retry() {
        let host = FakeHost::new();
        let (mut hl, _) = highlighter(&host, match_ids_cfg());
        hl.highlight(&[span(0.5, 0.5, 0.5, 0)]).await.unwrap();

        host.fail_clear(true);
        assert!(hl.clear_highlight().await.is_err());
        host.fail_clear(false);
        host.take_calls();

        hl.clear_highlight().await.unwrap();
        assert_eq!(host.calls(), vec![Call::ClearMatches(vec![MatchId(1)])]);
    }

    #[tokio::test]
    async fn edits_during_a_pass_report_stale() {
        let host = FakeHost::new();
        host.set_version(4);
        let (mut hl, _) = highlighter(&host, HighlightConfig::default());
        host.edit_on_render(true);

        let report = hl.highlight(&[span(0.5, 0.5, 0.5, 0)]).await.unwrap();
        assert_eq!(report.outcome, Outcome::Stale);
        assert_eq!(report.version, Some(4));
        assert_eq!(hl.version(), Some(4));
        assert!(hl.has_color());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_at_batch_boundary() {
        let host = FakeHost::new();
        let (mut hl, _) = highlighter(&host, HighlightConfig::default());
        let spans: Vec<ColorSpan> = (0..250).map(|i| span(0.1, 0.2, 0.3, i)).collect();
        let cancel = CancellationToken::new();

        let stopper = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            stopper.cancel();
        });
        let report = hl.highlight_until(&spans, &cancel).await.unwrap();

        assert_eq!(report.outcome, Outcome::Superseded);
        assert_eq!(report.batches, 1);
        assert_eq!(hl.colors().len(), 100);
        assert_eq!(host.count(|c| *c == Call::Pause), host.count(|c| *c == Call::Resume));
    }

    #[tokio::test]
    async fn dispose_is_terminal_and_idempotent() {
        let host = FakeHost::new();
        let (mut hl, _) = highlighter(&host, HighlightConfig::default());
        hl.highlight(&[span(0.5, 0.5, 0.5, 0)]).await.unwrap();

        hl.dispose().await;
        hl.dispose().await;
        assert!(hl.is_disposed());
        assert!(!hl.has_color());
        assert!(matches!(hl.highlight(&[]).await, Err(HighlightError::Disposed)));
        assert!(matches!(hl.clear_highlight().await, Err(HighlightError::Disposed)));
    }

    #[tokio::test]
    async fn dispose_closes_a_scope_left_open() {
        let host = FakeHost::new();
        let (mut hl, _) = highlighter(&host, HighlightConfig::default());
        hl.renderer.pause_notification();
        hl.scope_open = true;

        hl.dispose().await;
        assert_eq!(host.calls(), vec![Call::Pause, Call::Resume]);
    }
}
