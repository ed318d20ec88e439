//! # Core listener trait
//!
//! `Listener` is the extension point for plugging handlers into the
//! [`EventBus`](crate::EventBus). Every listener registered for an event name is
//! invoked concurrently with the other listeners of that name on each dispatch.
//!
//! ## Contract
//! - A listener may complete synchronously or suspend; both are awaited the same way.
//! - Returning `Err` (or panicking) marks the dispatch as failed; siblings
//!   already started still run to completion.
//! - Listeners must not assume any ordering relative to siblings.
//!
//! ## Example (skeleton)
//! ```rust
//! use async_trait::async_trait;
//! use huevisor::{Event, HandlerResult, Listener};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Listener for Audit {
//!     async fn on_event(&self, ev: &Event) -> HandlerResult {
//!         let _ = ev.seq;
//!         Ok(())
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use async_trait::async_trait;

use crate::error::HandlerResult;
use crate::events::Event;

/// Contract for event listeners.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Handle one dispatched event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn on_event(&self, event: &Event) -> HandlerResult;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a listener.
pub type ListenerRef = std::sync::Arc<dyn Listener>;
