//! Value Bus: keyed last-write-wins values plus synchronous broadcast
//!
//! Sliders publish `(id, value)` pairs; calculators subscribe without holding
//! references to any slider.

use serde::{Deserialize, Serialize};

mod subscriber;
mod value_bus;

pub use subscriber::ValueSubscriber;
pub use value_bus::ValueBus;

/// Handle returned by [`ValueBus::subscribe`]
pub type SubscriptionId = uuid::Uuid;

/// One published value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedValue {
    pub id: String,
    pub value: f64,
}
