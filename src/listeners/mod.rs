//! # Event listeners.
//!
//! This module provides the [`Listener`] trait, closure adapters, and the
//! [`Messenger`] capability the bus reports failures through.
//!
//! ## Architecture
//! ```text
//! Trigger ── fire(name, args) ──► EventBus ──► snapshot listeners for `name`
//!                                                   │
//!                                  ┌────────────────┼────────────────┐
//!                                  ▼                ▼                ▼
//!                            ListenerFn      TypedListener<E>   BoundListener<E,T>
//!                                  │                │                │
//!                                  └────── join_all (all started together) ──┐
//!                                                                            ▼
//!                                                    any Err/panic ──► Messenger::show_message
//! ```
//!
//! ## Listener types
//! - **Raw** listeners see the whole [`Event`](crate::Event) (multi-name registrations)
//! - **Typed** listeners see the arguments of one [`EditorEvent`](crate::events::EditorEvent)
//! - **Bound** listeners additionally receive a shared context object

mod listener;
mod listener_fn;
mod messenger;

pub use listener::{Listener, ListenerRef};
pub use listener_fn::{BoundListener, ListenerFn, TypedListener};
pub use messenger::{LogMessenger, MessageLevel, Messenger};
