//! Value bus implementation

use std::sync::{Arc, Weak};

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{PublishedValue, SubscriptionId, ValueSubscriber};

enum Registration {
    Strong(Arc<dyn ValueSubscriber>),
    Weak(Weak<dyn ValueSubscriber>),
}

struct Subscription {
    id: SubscriptionId,
    registration: Registration,
}

impl Subscription {
    fn is_alive(&self) -> bool {
        match &self.registration {
            Registration::Strong(_) => true,
            Registration::Weak(weak) => weak.strong_count() > 0,
        }
    }

    fn upgrade(&self) -> Option<Arc<dyn ValueSubscriber>> {
        match &self.registration {
            Registration::Strong(subscriber) => Some(subscriber.clone()),
            Registration::Weak(weak) => weak.upgrade(),
        }
    }
}

/// Page-wide published values and their subscribers.
///
/// Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct ValueBus {
    values: Arc<RwLock<AHashMap<String, f64>>>,
    subscribers: Arc<RwLock<Vec<Subscription>>>,
}

impl ValueBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `id` and notify every live subscriber.
    ///
    /// Subscribers are invoked in registration order with no lock held, so
    /// they may read from or publish to the bus themselves.
    pub fn publish(&self, id: impl Into<String>, value: f64) {
        let published = PublishedValue {
            id: id.into(),
            value,
        };

        self.values.write().insert(published.id.clone(), value);
        debug!(id = %published.id, value, "Value published");

        for subscriber in self.live_subscribers() {
            subscriber.on_value_published(&published);
        }
    }

    /// Register a subscriber for all future publishes. Past values are not replayed.
    pub fn subscribe(&self, subscriber: impl ValueSubscriber + 'static) -> SubscriptionId {
        self.register(Registration::Strong(Arc::new(subscriber)))
    }

    /// Register a subscriber that lapses once every strong reference to it is dropped
    pub fn subscribe_weak(&self, subscriber: &Arc<dyn ValueSubscriber>) -> SubscriptionId {
        self.register(Registration::Weak(Arc::downgrade(subscriber)))
    }

    /// Remove a subscription. Returns `false` if it was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|subscription| subscription.id != id);
        subscribers.len() != before
    }

    /// Last value published under `id`
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.read().get(id).copied()
    }

    /// Every stored value, sorted by id
    pub fn snapshot(&self) -> Vec<PublishedValue> {
        let mut values: Vec<PublishedValue> = self
            .values
            .read()
            .iter()
            .map(|(id, value)| PublishedValue {
                id: id.clone(),
                value: *value,
            })
            .collect();
        values.sort_by(|a, b| a.id.cmp(&b.id));
        values
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(Subscription::is_alive);
        subscribers.len()
    }

    fn register(&self, registration: Registration) -> SubscriptionId {
        let id = Uuid::new_v4();
        self.subscribers.write().push(Subscription { id, registration });
        id
    }

    fn live_subscribers(&self) -> Vec<Arc<dyn ValueSubscriber>> {
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(Subscription::is_alive);

        subscribers.iter().filter_map(Subscription::upgrade).collect()
    }
}

impl std::fmt::Debug for ValueBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueBus")
            .field("values", &*self.values.read())
            .field("subscribers", &self.subscribers.read().len())
            .finish()
    }
}
