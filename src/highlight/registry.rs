//! # Highlighter registry - one highlighter per buffer.
//!
//! [`Highlighters`] owns a [`HighlightSlot`] per buffer number, created on first
//! use, and drops it when the buffer goes away.
//!
//! ## Architecture
//! ```text
//! color provider ──► get_or_create(bufnr, document) ──► HighlightSlot ──► highlight(spans)
//!
//! EventBus ──► BufUnload(bufnr) ──► remove(bufnr) ──► slot.dispose()
//! ```
//!
//! ## Rules
//! - Every slot shares the registry's renderer, style registry and config.
//! - A removed buffer's slot is disposed before `remove` returns.
//! - Lifecycle cleanup is event-driven via [`Highlighters::attach`] (no polling).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::highlighter::Highlighter;
use super::host::{Document, Renderer};
use super::slot::HighlightSlot;
use super::styles::StyleRegistry;
use crate::config::HighlightConfig;
use crate::events::{BufNr, EventBus, Subscription, kinds};

/// Registry of per-buffer highlighters.
pub struct Highlighters {
    slots: RwLock<HashMap<BufNr, Arc<HighlightSlot>>>,
    renderer: Arc<dyn Renderer>,
    styles: Arc<StyleRegistry>,
    cfg: HighlightConfig,
}

impl Highlighters {
    /// Creates an empty registry.
    pub fn new(
        renderer: Arc<dyn Renderer>,
        styles: Arc<StyleRegistry>,
        cfg: HighlightConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            slots: RwLock::new(HashMap::new()),
            renderer,
            styles,
            cfg,
        })
    }

    /// Disposes a buffer's highlighter when the bus reports `BufUnload` for it.
    ///
    /// Dispose the returned subscription to stop listening.
    pub fn attach(self: &Arc<Self>, bus: &EventBus) -> Subscription {
        bus.on_bound::<kinds::BufUnload, _, _, _>(self.clone(), |me, bufnr| async move {
            me.remove(bufnr).await;
            Ok(())
        })
    }

    /// Returns the slot for `bufnr`, creating it for `document` if absent.
    ///
    /// `document` is ignored when the buffer already has a slot.
    pub async fn get_or_create(&self, bufnr: BufNr, document: Arc<dyn Document>) -> Arc<HighlightSlot> {
        if let Some(slot) = self.slots.read().await.get(&bufnr) {
            return slot.clone();
        }

        let mut slots = self.slots.write().await;
        slots
            .entry(bufnr)
            .or_insert_with(|| {
                tracing::debug!(bufnr, "highlight.slot_created");
                Arc::new(HighlightSlot::new(Highlighter::new(
                    document,
                    self.renderer.clone(),
                    self.styles.clone(),
                    self.cfg.clone(),
                )))
            })
            .clone()
    }

    pub async fn get(&self, bufnr: BufNr) -> Option<Arc<HighlightSlot>> {
        self.slots.read().await.get(&bufnr).cloned()
    }

    /// Removes and disposes the slot for `bufnr`. Returns false if there was none.
    pub async fn remove(&self, bufnr: BufNr) -> bool {
        let slot = self.slots.write().await.remove(&bufnr);
        match slot {
            Some(slot) => {
                slot.dispose().await;
                tracing::debug!(bufnr, "highlight.slot_removed");
                true
            }
            None => false,
        }
    }

    /// Disposes every slot and empties the registry.
    pub async fn dispose_all(&self) {
        let drained: Vec<Arc<HighlightSlot>> = {
            let mut slots = self.slots.write().await;
            slots.drain().map(|(_, s)| s).collect()
        };
        for slot in drained {
            slot.dispose().await;
        }
    }

    /// Returns the sorted list of buffers with a highlighter.
    pub async fn buffers(&self) -> Vec<BufNr> {
        let mut out: Vec<BufNr> = self.slots.read().await.keys().copied().collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::color::{Color, ColorSpan, Range};
    use crate::highlight::testing::FakeHost;

    fn registry(host: &Arc<FakeHost>) -> Arc<Highlighters> {
        Highlighters::new(host.clone(), Arc::new(StyleRegistry::new()), HighlightConfig::default())
    }

    #[tokio::test]
    async fn slots_are_created_once_per_buffer() {
        let host = FakeHost::new();
        let reg = registry(&host);

        let a = reg.get_or_create(3, host.clone()).await;
        let b = reg.get_or_create(3, host.clone()).await;
        reg.get_or_create(1, host.clone()).await;

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(reg.buffers().await, vec![1, 3]);
        assert!(reg.get(2).await.is_none());
    }

    #[tokio::test]
    async fn highlighters_share_one_style_registry() {
        let host = FakeHost::new();
        let styles = Arc::new(StyleRegistry::new());
        let reg = Highlighters::new(host.clone(), styles.clone(), HighlightConfig::default());
        let span = [ColorSpan::new(Color::rgb(0.0, 1.0, 1.0), Range::new(0, 0, 0, 4))];

        let first = reg.get_or_create(1, host.clone()).await.highlight(&span).await.unwrap();
        let second = reg.get_or_create(2, host.clone()).await.highlight(&span).await.unwrap();

        assert_eq!(first.styles_registered, 1);
        assert_eq!(second.styles_registered, 0);
        assert_eq!(styles.len(), 1);
    }

    #[tokio::test]
    async fn buf_unload_disposes_the_buffer_highlighter() {
        let host = FakeHost::new();
        let reg = registry(&host);
        let bus = EventBus::with_log_messenger();
        let sub = reg.attach(&bus);

        let slot = reg.get_or_create(5, host.clone()).await;
        reg.get_or_create(6, host.clone()).await;

        bus.emit::<kinds::BufUnload>(5).await;
        assert!(slot.is_disposed().await);
        assert_eq!(reg.buffers().await, vec![6]);

        // unknown buffers are ignored
        bus.emit::<kinds::BufUnload>(42).await;

        sub.dispose();
        bus.emit::<kinds::BufUnload>(6).await;
        assert_eq!(reg.buffers().await, vec![6]);

        reg.dispose_all().await;
        assert!(reg.buffers().await.is_empty());
        assert!(!reg.remove(6).await);
    }
}
