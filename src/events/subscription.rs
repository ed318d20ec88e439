//! # Disposal tokens for listener registrations.
//!
//! Every registration on the [`EventBus`](crate::EventBus) returns a
//! [`Subscription`]. Disposing it removes the listener from every event name it
//! was registered under, in one step, by registration identity. Other
//! registrations of the same listener object are untouched.
//!
//! ## Rules
//! - `dispose()` is idempotent; the second call is a no-op.
//! - Dropping a subscription does **not** dispose it: registrations live until
//!   disposed or until the bus itself is dropped.
//! - Clones share state: disposing any clone disposes the registration.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Weak};

use super::bus::Handlers;
use super::event::EventName;

struct Entry {
    handlers: Weak<Handlers>,
    keys: Vec<(EventName, u64)>,
    disposed: AtomicBool,
}

/// Token that revokes one registration.
#[derive(Clone)]
pub struct Subscription {
    entry: Arc<Entry>,
}

impl Subscription {
    pub(crate) fn new(handlers: Weak<Handlers>, keys: Vec<(EventName, u64)>) -> Self {
        Self {
            entry: Arc::new(Entry {
                handlers,
                keys,
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// Removes the listener from every event name it was registered under.
    pub fn dispose(&self) {
        if self.entry.disposed.swap(true, AtomicOrdering::AcqRel) {
            return;
        }
        if let Some(handlers) = self.entry.handlers.upgrade() {
            handlers.remove(&self.entry.keys);
        }
    }

    /// True once [`dispose`](Self::dispose) was called on this token or a clone.
    pub fn is_disposed(&self) -> bool {
        self.entry.disposed.load(AtomicOrdering::Acquire)
    }

    /// Event names this registration covers.
    pub fn events(&self) -> impl Iterator<Item = EventName> + '_ {
        self.entry.keys.iter().map(|(name, _)| *name)
    }

    /// Also records this token in `set` and returns it.
    ///
    /// The returned token keeps full control over the registration; `set` only
    /// aggregates it for a later [`Disposables::dispose_all`].
    pub fn add_to(self, set: &mut Disposables) -> Self {
        set.push(self.clone());
        self
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("events", &self.events().collect::<Vec<_>>())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Ordered collection of subscriptions disposed together.
#[derive(Debug, Default)]
pub struct Disposables {
    items: Vec<Subscription>,
}

impl Disposables {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token.
    pub fn push(&mut self, sub: Subscription) {
        self.items.push(sub);
    }

    /// Disposes every token in insertion order and empties the collection.
    pub fn dispose_all(&mut self) {
        for sub in self.items.drain(..) {
            sub.dispose();
        }
    }

    /// Number of tokens held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no tokens are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
