//! # huevisor
//!
//! **Huevisor** is the in-process core of an editor color plugin: a typed,
//! async event bus that fans editor notifications out to listeners, and a
//! batched highlight manager that paints detected color literals.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  editor autocmds                                  color provider
//!        │                                                │ spans
//!        ▼                                                ▼
//! ┌───────────────────────────────┐        ┌───────────────────────────────┐
//! │ EventBus                      │        │ Highlighters (per buffer)     │
//! │  - EventName → [listeners]    │        │  - HighlightSlot (single-     │
//! │  - join_all fan-out           │        │    flight, supersede)         │
//! │  - failures → Messenger       │        │  - Highlighter (clear, batch, │
//! └──────┬────────────────────────┘        │    register styles, render)   │
//!        │ BufUnload(bufnr)                └──────┬─────────────────┬──────┘
//!        └──────────────────────────────────►     │ Renderer        │ Document
//!                               dispose slot      ▼                 ▼
//!                                            host commands     host regions
//! ```
//!
//! ### Highlight pass
//! ```text
//! version ─► clear ─► for each batch of 100:
//!                       [50ms pause] ─► pause_notification ─► group by color
//!                       ─► register new BG<hex> styles ─► render groups ─► resume_notification
//!            ─► colors = rendered spans ─► Applied | Stale | Superseded
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types                                  |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Events**        | Closed event taxonomy with a documented payload per name     | [`EventName`], [`EventArgs`], [`kinds`](events::kinds) |
//! | **Bus**           | Concurrent fan-out; failures logged and shown, never thrown  | [`EventBus`], [`Subscription`]             |
//! | **Listeners**     | Raw, typed and context-bound handlers                        | [`Listener`], [`ListenerFn`]               |
//! | **Highlighting**  | Paced batches, shared style registry, two clear strategies   | [`Highlighter`], [`StyleRegistry`]         |
//! | **Serialization** | One pass per document; a newer pass supersedes               | [`HighlightSlot`], [`Highlighters`]        |
//!
//! ## Example
//! ```rust
//! use huevisor::{EventBus, events::kinds};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = EventBus::with_log_messenger();
//!     let sub = bus.on::<kinds::BufEnter, _, _>(|bufnr| async move {
//!         tracing::info!(bufnr, "entered");
//!         Ok(())
//!     });
//!
//!     bus.emit::<kinds::BufEnter>(1).await;
//!     sub.dispose();
//! }
//! ```

mod config;
mod error;
pub mod events;
pub mod highlight;
pub mod listeners;

// ---- Public re-exports ----

pub use config::{ClearStrategy, HighlightConfig};
pub use error::{DispatchError, HandlerFailure, HandlerResult, HighlightError, HostError};
pub use events::{
    ArgShape, BufNr, CompleteItem, Disposables, Event, EventArgs, EventBus, EventName,
    OptionValue, Subscription, WinId,
};
pub use highlight::{
    ClearTarget, Color, ColorRangeGroup, ColorSpan, Document, HighlightReport, HighlightSlot,
    Highlighter, Highlighters, MatchId, Outcome, Position, Range, Renderer, Rgb8, SourceId,
    StyleRegistry,
};
pub use listeners::{
    BoundListener, Listener, ListenerFn, ListenerRef, LogMessenger, MessageLevel, Messenger,
    TypedListener,
};
