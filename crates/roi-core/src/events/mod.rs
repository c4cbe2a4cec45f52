use std::sync::Arc;
use parking_lot::RwLock;
use ahash::AHashMap;

/// Typed event dispatch, scoped to whatever owns the bus (a slider element
/// or the whole page)
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<AHashMap<std::any::TypeId, Vec<Arc<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &dyn Event);
}

/// Widget events
pub mod events {
    use super::Event;
    use crate::scale::Scale;

    /// Dispatched on a slider's own element after every update
    #[derive(Debug, Clone, PartialEq)]
    pub struct SliderChanged {
        pub id: String,
        pub value: f64,
        pub position: f64,
        pub scale: Scale,
        pub currency: String,
    }

    /// A drag or press on the slider ended
    #[derive(Debug, Clone, PartialEq)]
    pub struct SliderReleased {
        pub id: String,
        pub value: f64,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(SliderChanged, SliderReleased);
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Arc<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.write();
        handlers.entry(type_id).or_default().push(handler);
    }

    /// Subscribe a closure to events of type `E`
    pub fn on<E, F>(&self, f: F)
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event: &dyn Event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event to every handler registered for its type
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();

        // Handlers may subscribe or publish while running
        let handlers = self
            .handlers
            .read()
            .get(&type_id)
            .cloned()
            .unwrap_or_default();

        for handler in handlers {
            handler.handle(&event);
        }
    }

    /// Number of handlers registered for `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .read()
            .get(&std::any::TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.handlers.read().len())
            .finish()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: Fn(&dyn Event) + Send + Sync,
{
    fn handle(&self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Arc<dyn EventHandler>
where
    F: Fn(&dyn Event) + Send + Sync + 'static,
{
    Arc::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::{SliderChanged, SliderReleased};
    use super::*;
    use crate::scale::Scale;
    use parking_lot::Mutex;

    fn changed(value: f64) -> SliderChanged {
        SliderChanged {
            id: "salary".to_string(),
            value,
            position: 0.5,
            scale: Scale::default_markers(),
            currency: "€".to_string(),
        }
    }

    #[test]
    fn test_dispatch_by_type() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.on(move |event: &SliderChanged| sink.lock().push(event.value));

        bus.publish(changed(100.0));
        bus.publish(SliderReleased {
            id: "salary".to_string(),
            value: 100.0,
        });
        bus.publish(changed(250.0));

        assert_eq!(*seen.lock(), vec![100.0, 250.0]);
        assert_eq!(bus.handler_count::<SliderChanged>(), 1);
        assert_eq!(bus.handler_count::<SliderReleased>(), 0);
    }

    #[test]
    fn test_handler_can_publish() {
        let bus = EventBus::new();
        let released = Arc::new(Mutex::new(0));

        let inner = bus.clone();
        bus.on(move |event: &SliderChanged| {
            inner.publish(SliderReleased {
                id: event.id.clone(),
                value: event.value,
            })
        });
        let counter = released.clone();
        bus.on(move |_: &SliderReleased| *counter.lock() += 1);

        bus.publish(changed(1.0));
        assert_eq!(*released.lock(), 1);
    }
}
