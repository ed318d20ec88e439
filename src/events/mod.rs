//! Editor events: names, payloads, typed markers and the bus.
//!
//! This module groups the event **data model** and the **bus** that fans
//! editor notifications out to registered listeners.
//!
//! ## Contents
//! - [`EventName`], [`ArgShape`], [`EventArgs`], [`Event`] the closed event taxonomy and payloads
//! - [`EditorEvent`] and the [`kinds`] markers mapping each name to its argument type
//! - [`EventBus`] registration, dispatch and the process-wide instance
//! - [`Subscription`], [`Disposables`] disposal tokens
//!
//! ## Quick reference
//! - **Publishers**: the plugin's autocmd bridge calls [`EventBus::fire`] / [`EventBus::emit`].
//! - **Consumers**: plugin features register via [`EventBus::on`], [`EventBus::on_many`],
//!   [`EventBus::subscribe`]; [`Highlighters::attach`](crate::Highlighters::attach) is one of them.

mod bus;
mod event;
pub mod kinds;
mod subscription;

pub use bus::EventBus;
pub use event::{ArgShape, BufNr, CompleteItem, Event, EventArgs, EventName, OptionValue, WinId};
pub use kinds::EditorEvent;
pub use subscription::{Disposables, Subscription};
