//! # Event Bus
//!
//! A publish/subscribe registry keyed by topic name, used to tell interested views that
//! a collection changed (e.g. `"customerListModification"` after a delete).
//!
//! There is no global instance. The composition root creates one [`EventBus`] and hands
//! clones of it to everything that publishes or listens; clones share one registry.
//!
//! Subscribing returns a [`Subscription`]. Dropping it, or calling
//! [`SubscriptionHandle::unsubscribe`], removes the listener from the registry at once:
//! any publish after that point reaches nobody.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// A payload-free notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: Arc<str>,
}

/// Registry key of one listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    topics: HashMap<Arc<str>, Vec<(SubscriptionId, mpsc::UnboundedSender<Event>)>>,
}

/// Process-lifetime broadcast registry. Cheap to clone.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a listener on `name`.
    pub fn subscribe(&self, name: &str) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut registry = self.registry();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;

        let topic: Arc<str> = Arc::from(name);
        registry
            .topics
            .entry(topic.clone())
            .or_default()
            .push((id, sender));
        debug!(topic = %topic, ?id, "Subscribed");

        Subscription {
            handle: SubscriptionHandle {
                id,
                topic,
                bus: self.clone(),
            },
            receiver,
        }
    }

    /// Broadcasts `name` to every current listener and returns how many received it.
    pub fn publish(&self, name: &str) -> usize {
        let event = Event {
            name: Arc::from(name),
        };
        let mut registry = self.registry();
        let Some(listeners) = registry.topics.get_mut(name) else {
            trace!(topic = name, "Published with no listeners");
            return 0;
        };

        listeners.retain(|(_, sender)| sender.send(event.clone()).is_ok());
        let delivered = listeners.len();
        debug!(topic = name, delivered, "Published");
        delivered
    }

    /// Removes one listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut registry = self.registry();
        for listeners in registry.topics.values_mut() {
            listeners.retain(|(listener, _)| *listener != id);
        }
        registry.topics.retain(|_, listeners| !listeners.is_empty());
        debug!(?id, "Unsubscribed");
    }

    /// Number of live listeners on `name`.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.registry().topics.get(name).map_or(0, Vec::len)
    }
}

/// Owns a registration; unsubscribes on drop.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    topic: Arc<str>,
    bus: EventBus,
}

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        f.debug_struct("EventBus")
            .field("topics", &registry.topics.len())
            .finish()
    }
}

/// A live registration plus the stream of events delivered to it.
#[derive(Debug)]
pub struct Subscription {
    handle: SubscriptionHandle,
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.handle.id
    }

    /// Next event, or `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Separates the registration from the event stream, so the stream can move into a
    /// task while the owner keeps the power to unsubscribe synchronously.
    pub fn split(self) -> (SubscriptionHandle, mpsc::UnboundedReceiver<Event>) {
        (self.handle, self.receiver)
    }
}
