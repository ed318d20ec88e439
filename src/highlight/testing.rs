//! Recording fake host used by the highlight tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::color::Range;
use super::host::{ClearTarget, Document, MatchId, Renderer, SourceId};
use crate::error::HostError;

/// One observed host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Pause,
    Resume,
    Command { text: String, silent: bool },
    Render { style: String, ranges: usize },
    ClearMatches(Vec<MatchId>),
    ClearSource(SourceId),
}

/// Fake implementing both [`Document`] and [`Renderer`].
#[derive(Default)]
pub(crate) struct FakeHost {
    calls: Mutex<Vec<Call>>,
    version: AtomicI64,
    next_match: AtomicI64,
    fail_render: AtomicBool,
    fail_render_at: Mutex<Option<usize>>,
    renders: AtomicUsize,
    fail_clear: AtomicBool,
    edit_on_render: AtomicBool,
}

impl FakeHost {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub(crate) fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Command { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn fail_render(&self, on: bool) {
        self.fail_render.store(on, Ordering::SeqCst);
    }

    /// Only the render call with this zero-based index fails.
    pub(crate) fn fail_render_at(&self, call: usize) {
        *self.fail_render_at.lock() = Some(call);
    }

    pub(crate) fn fail_clear(&self, on: bool) {
        self.fail_clear.store(on, Ordering::SeqCst);
    }

    /// Every render call bumps the document version, as if the user kept typing.
    pub(crate) fn edit_on_render(&self, on: bool) {
        self.edit_on_render.store(on, Ordering::SeqCst);
    }

    pub(crate) fn set_version(&self, v: i64) {
        self.version.store(v, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Document for FakeHost {
    fn version(&self) -> i64 {
        self.version.load(Ordering::SeqCst)
    }

    async fn highlight_ranges(
        &self,
        ranges: &[Range],
        style: &str,
        _source: SourceId,
    ) -> Result<Vec<MatchId>, HostError> {
        let call = self.renders.fetch_add(1, Ordering::SeqCst);
        if self.fail_render.load(Ordering::SeqCst) || *self.fail_render_at.lock() == Some(call) {
            return Err(HostError::new("E5555: render refused"));
        }
        if self.edit_on_render.load(Ordering::SeqCst) {
            self.version.fetch_add(1, Ordering::SeqCst);
        }
        self.record(Call::Render {
            style: style.to_string(),
            ranges: ranges.len(),
        });
        Ok(ranges
            .iter()
            .map(|_| MatchId(self.next_match.fetch_add(1, Ordering::SeqCst) + 1))
            .collect())
    }

    async fn clear_match_ids(&self, target: ClearTarget<'_>) -> Result<(), HostError> {
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(HostError::new("E803: ID not found"));
        }
        self.record(match target {
            ClearTarget::Matches(ids) => Call::ClearMatches(ids.to_vec()),
            ClearTarget::Source(id) => Call::ClearSource(id),
        });
        Ok(())
    }
}

#[async_trait]
impl Renderer for FakeHost {
    fn pause_notification(&self) {
        self.record(Call::Pause);
    }

    async fn resume_notification(&self) -> Result<(), HostError> {
        self.record(Call::Resume);
        Ok(())
    }

    async fn command(&self, text: &str, silent: bool) -> Result<(), HostError> {
        self.record(Call::Command {
            text: text.to_string(),
            silent,
        });
        Ok(())
    }
}
