//! # Event bus for editor notifications.
//!
//! [`EventBus`] maps each [`EventName`] to an ordered list of listeners and fans
//! every dispatch out to all of them concurrently.
//!
//! ## Architecture
//! ```text
//! Trigger source (editor autocmds):
//!   fire(BufEnter, {bufnr}) ──► EventBus ──► snapshot(BufEnter) ──► [L1, L2, ... LN]
//!                                                                    │   │       │
//!                                                              join_all (started together)
//!                                                                    │
//!                                           all Ok ──► done          └──► any Err/panic
//!                                                                          ├─► tracing::error!(event, listener, error)
//!                                                                          └─► Messenger::show_message(Error)
//! ```
//!
//! ## Rules
//! - **Registration order is invocation order**: listeners of one name are started in the
//!   order they were registered; completion order is unspecified.
//! - **Snapshot at invocation**: (un)registering while a dispatch is in flight never affects
//!   the listeners of that dispatch, and never blocks on it.
//! - **Fire never fails**: [`EventBus::fire`] logs failures and reports them through the
//!   [`Messenger`]; the typed result is only visible through the crate-internal `dispatch`.
//! - **No short-circuit**: a failing listener does not stop siblings already started.
//! - **Shape checked**: payloads whose [`ArgShape`](super::ArgShape) differs from the one
//!   documented for the event are rejected before any listener runs. A name with no
//!   listeners is a no-op whatever its payload.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, OnceLock};

use anyhow::anyhow;
use futures::FutureExt;
use futures::future::join_all;
use parking_lot::RwLock;

use crate::error::{DispatchError, HandlerFailure, HandlerResult};
use crate::listeners::{
    BoundListener, ListenerFn, ListenerRef, LogMessenger, MessageLevel, Messenger, TypedListener,
};

use super::event::{Event, EventArgs, EventName};
use super::kinds::EditorEvent;
use super::subscription::Subscription;

/// Process-wide bus installed by the plugin runtime.
static GLOBAL: OnceLock<EventBus> = OnceLock::new();

#[derive(Clone)]
struct Registration {
    id: u64,
    listener: ListenerRef,
}

/// Listener table shared by a bus and its subscriptions.
pub(crate) struct Handlers {
    map: RwLock<HashMap<EventName, Vec<Registration>>>,
    next_id: AtomicU64,
}

impl Handlers {
    fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers `listener` once per distinct name; returns the keys to remove it again.
    fn insert(&self, names: &[EventName], listener: ListenerRef) -> Vec<(EventName, u64)> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        let mut map = self.map.write();
        let mut keys = Vec::with_capacity(names.len());
        for &name in names {
            if keys.iter().any(|(n, _)| *n == name) {
                continue;
            }
            map.entry(name).or_default().push(Registration {
                id,
                listener: Arc::clone(&listener),
            });
            keys.push((name, id));
        }
        keys
    }

    /// Removes the given registrations under one lock.
    pub(crate) fn remove(&self, keys: &[(EventName, u64)]) {
        let mut map = self.map.write();
        for (name, id) in keys {
            if let Some(regs) = map.get_mut(name) {
                regs.retain(|r| r.id != *id);
                if regs.is_empty() {
                    map.remove(name);
                }
            }
        }
    }

    fn snapshot(&self, name: EventName) -> Vec<ListenerRef> {
        self.map
            .read()
            .get(&name)
            .map(|regs| regs.iter().map(|r| Arc::clone(&r.listener)).collect())
            .unwrap_or_default()
    }

    fn count(&self, name: EventName) -> usize {
        self.map.read().get(&name).map_or(0, Vec::len)
    }
}

/// Typed publish/subscribe bus for editor events.
///
/// Cheap to clone; clones share the same listener table.
///
/// ### Properties
/// - **Concurrent fan-out**: all listeners of a dispatch are started before any is awaited.
/// - **Resilient**: the trigger source never observes listener failures.
/// - **Identity-based disposal**: a [`Subscription`] removes exactly its own registrations.
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<Handlers>,
    messenger: Arc<dyn Messenger>,
}

impl EventBus {
    /// Creates a bus reporting failures through `messenger`.
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self {
            handlers: Arc::new(Handlers::new()),
            messenger,
        }
    }

    /// Creates a bus that reports failures to `tracing` only.
    pub fn with_log_messenger() -> Self {
        Self::new(Arc::new(LogMessenger::new()))
    }

    /// Installs `bus` as the process-wide instance.
    ///
    /// Returns the bus back if one was already installed.
    pub fn install_global(bus: EventBus) -> Result<(), EventBus> {
        GLOBAL.set(bus)
    }

    /// The process-wide instance, if installed.
    pub fn global() -> Option<&'static EventBus> {
        GLOBAL.get()
    }

    /// Registers `listener` for every name in `names`.
    ///
    /// Disposing the returned token removes it from all of them at once.
    pub fn subscribe<I>(&self, names: I, listener: ListenerRef) -> Subscription
    where
        I: IntoIterator<Item = EventName>,
    {
        let names: Vec<EventName> = names.into_iter().collect();
        let keys = self.handlers.insert(&names, listener);
        Subscription::new(Arc::downgrade(&self.handlers), keys)
    }

    /// Registers a typed handler for `E`.
    ///
    /// ## Example
    /// ```rust
    /// use huevisor::{EventBus, events::kinds};
    ///
    /// let bus = EventBus::with_log_messenger();
    /// let sub = bus.on::<kinds::FileType, _, _>(|(filetype, bufnr)| async move {
    ///     let _ = (filetype, bufnr);
    ///     Ok(())
    /// });
    /// assert_eq!(bus.listener_count(huevisor::EventName::FileType), 1);
    /// sub.dispose();
    /// assert_eq!(bus.listener_count(huevisor::EventName::FileType), 0);
    /// ```
    pub fn on<E, F, Fut>(&self, f: F) -> Subscription
    where
        E: EditorEvent,
        F: Fn(E::Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.subscribe([E::NAME], Arc::new(TypedListener::<E, F>::new(f)))
    }

    /// Registers a typed handler for `E` invoked with the bound context `ctx`.
    pub fn on_bound<E, T, F, Fut>(&self, ctx: Arc<T>, f: F) -> Subscription
    where
        E: EditorEvent,
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, E::Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.subscribe([E::NAME], Arc::new(BoundListener::<E, T, F>::new(ctx, f)))
    }

    /// Registers one handler for a set of names; it receives the whole [`Event`].
    pub fn on_many<I, F, Fut>(&self, names: I, f: F) -> Subscription
    where
        I: IntoIterator<Item = EventName>,
        F: Fn(Arc<Event>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.subscribe(names, ListenerFn::arc(std::any::type_name::<F>(), f))
    }

    /// Number of listeners currently registered for `name`.
    pub fn listener_count(&self, name: EventName) -> usize {
        self.handlers.count(name)
    }

    /// Dispatches `args` to every listener of `name` and waits for all of them.
    ///
    /// Never fails: listener errors are logged with the event name and reported
    /// to the user through the [`Messenger`].
    pub async fn fire(&self, name: EventName, args: EventArgs) {
        let event = Event::new(name, args);
        tracing::debug!(event = %name, seq = event.seq, args = ?event.args, "event.fire");
        if let Err(err) = self.dispatch(event).await {
            self.report(&err);
        }
    }

    /// Typed form of [`fire`](Self::fire).
    pub async fn emit<E: EditorEvent>(&self, args: E::Args) {
        self.fire(E::NAME, E::pack(args)).await;
    }

    /// Fires an event named by the editor's own string (e.g. `"BufEnter"`).
    ///
    /// Unknown names are logged and ignored.
    pub async fn fire_str(&self, name: &str, args: EventArgs) {
        match EventName::from_str(name) {
            Ok(name) => self.fire(name, args).await,
            Err(_) => tracing::warn!(event = name, "event.unknown"),
        }
    }

    /// Runs one dispatch and returns how many listeners completed.
    ///
    /// ### Flow
    /// 1. Snapshot the listeners of `event.name` (none → `Ok(0)`, whatever the payload)
    /// 2. Reject payloads of the wrong shape
    /// 3. Start all of them, await all of them
    /// 4. Collect every failure (errors and panics) into one [`DispatchError`]
    pub(crate) async fn dispatch(&self, event: Event) -> Result<usize, DispatchError> {
        let listeners = self.handlers.snapshot(event.name);
        if listeners.is_empty() {
            return Ok(0);
        }

        if !event.is_well_formed() {
            return Err(DispatchError::ArgsMismatch {
                event: event.name,
                expected: event.name.shape(),
                got: event.args.shape(),
            });
        }

        let total = listeners.len();
        let name = event.name;
        let event = Arc::new(event);
        let results = join_all(
            listeners
                .into_iter()
                .map(|listener| invoke(listener, Arc::clone(&event))),
        )
        .await;

        let failures: Vec<HandlerFailure> = results.into_iter().filter_map(Result::err).collect();
        if failures.is_empty() {
            Ok(total)
        } else {
            Err(DispatchError::HandlersFailed {
                event: name,
                total,
                failures,
            })
        }
    }

    fn report(&self, err: &DispatchError) {
        match err {
            DispatchError::HandlersFailed {
                event, failures, ..
            } => {
                for failure in failures {
                    tracing::error!(
                        event = %event,
                        listener = failure.listener,
                        error = ?failure.error,
                        "Error on {event}"
                    );
                }
            }
            other => {
                tracing::error!(
                    event = %other.event(),
                    label = other.as_label(),
                    error = %other,
                    "Error on {}",
                    other.event()
                );
            }
        }
        self.messenger
            .show_message(&err.as_message(), MessageLevel::Error);
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

/// Invokes one listener, converting errors and panics into a [`HandlerFailure`].
async fn invoke(listener: ListenerRef, event: Arc<Event>) -> Result<(), HandlerFailure> {
    let name = listener.name();
    let fut = AssertUnwindSafe(async move { listener.on_event(&event).await });
    match fut.catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => Err(HandlerFailure {
            listener: name,
            error,
        }),
        Err(panic_err) => {
            let info = {
                let any = &*panic_err;
                if let Some(msg) = any.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = any.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                }
            };
            Err(HandlerFailure {
                listener: name,
                error: anyhow!("listener panicked: {info}"),
            })
        }
    }
}
