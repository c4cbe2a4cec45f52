//! Value subscriber trait

use super::PublishedValue;

/// Trait for components that react to published values
pub trait ValueSubscriber: Send + Sync {
    /// Called synchronously on every publish, after the value is stored
    fn on_value_published(&self, published: &PublishedValue);
}

impl<F> ValueSubscriber for F
where
    F: Fn(&PublishedValue) + Send + Sync,
{
    fn on_value_published(&self, published: &PublishedValue) {
        self(published)
    }
}
