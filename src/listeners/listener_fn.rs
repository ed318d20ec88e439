//! # Closure-backed listeners
//!
//! Adapters that turn closures into [`Listener`]s. Each closure *creates* a new
//! future per dispatch, so no state is shared between invocations unless the
//! closure captures it explicitly (`Arc<...>`).
//!
//! - [`ListenerFn`]: receives the whole [`Event`] (used for multi-name registrations).
//! - [`TypedListener`]: receives the typed arguments of one [`EditorEvent`].
//! - [`BoundListener`]: like [`TypedListener`], plus a bound context object.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use huevisor::{Event, Listener, ListenerFn};
//!
//! let l = ListenerFn::arc("printer", |ev: Arc<Event>| async move {
//!     let _ = ev.name;
//!     Ok(())
//! });
//! assert_eq!(l.name(), "printer");
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::error::HandlerResult;
use crate::events::{EditorEvent, Event};

use super::Listener;

/// Listener backed by a closure over the raw event.
pub struct ListenerFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ListenerFn<F> {
    /// Creates a new closure-backed listener.
    pub fn new<Fut>(name: &'static str, f: F) -> Self
    where
        F: Fn(Arc<Event>) -> Fut,
        Fut: Future<Output = HandlerResult>,
    {
        Self { name, f }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc<Fut>(name: &'static str, f: F) -> Arc<Self>
    where
        F: Fn(Arc<Event>) -> Fut,
        Fut: Future<Output = HandlerResult>,
    {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Listener for ListenerFn<F>
where
    F: Fn(Arc<Event>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn on_event(&self, event: &Event) -> HandlerResult {
        (self.f)(Arc::new(event.clone())).await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

fn unpack<E: EditorEvent>(event: &Event) -> anyhow::Result<E::Args> {
    E::unpack(&event.args).ok_or_else(|| {
        anyhow!(
            "{} listener got {:?} arguments",
            E::NAME,
            event.args.shape()
        )
    })
}

/// Listener for one event kind, handed the typed arguments.
pub struct TypedListener<E, F> {
    f: F,
    _event: PhantomData<fn() -> E>,
}

impl<E: EditorEvent, F> TypedListener<E, F> {
    /// Wraps `f` as a listener for `E`.
    pub fn new<Fut>(f: F) -> Self
    where
        F: Fn(E::Args) -> Fut,
        Fut: Future<Output = HandlerResult>,
    {
        Self {
            f,
            _event: PhantomData,
        }
    }
}

#[async_trait]
impl<E, F, Fut> Listener for TypedListener<E, F>
where
    E: EditorEvent,
    F: Fn(E::Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn on_event(&self, event: &Event) -> HandlerResult {
        let args = unpack::<E>(event)?;
        (self.f)(args).await
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }
}

/// Typed listener invoked with a bound context.
///
/// The context is shared (`Arc`) and handed to every invocation, the way a
/// method registered on behalf of a long-lived object would see its receiver.
pub struct BoundListener<E, T, F> {
    ctx: Arc<T>,
    f: F,
    _event: PhantomData<fn() -> E>,
}

impl<E: EditorEvent, T, F> BoundListener<E, T, F> {
    /// Binds `f` to `ctx`.
    pub fn new<Fut>(ctx: Arc<T>, f: F) -> Self
    where
        F: Fn(Arc<T>, E::Args) -> Fut,
        Fut: Future<Output = HandlerResult>,
    {
        Self {
            ctx,
            f,
            _event: PhantomData,
        }
    }
}

#[async_trait]
impl<E, T, F, Fut> Listener for BoundListener<E, T, F>
where
    E: EditorEvent,
    T: Send + Sync + 'static,
    F: Fn(Arc<T>, E::Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn on_event(&self, event: &Event) -> HandlerResult {
        let args = unpack::<E>(event)?;
        (self.f)(Arc::clone(&self.ctx), args).await
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
