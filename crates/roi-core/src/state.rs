//! Page state management

use std::sync::Arc;

use crate::bus::{PublishedValue, ValueBus};

/// Shared state owned by the page composition root and handed to each widget
#[derive(Clone, Debug, Default)]
pub struct PageState {
    /// Published slider values
    pub bus: Arc<ValueBus>,
}

impl PageState {
    /// Create a new page state
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value published under `id`
    pub fn published(&self, id: &str) -> Option<f64> {
        self.bus.get(id)
    }

    /// All published values
    pub fn published_values(&self) -> Vec<PublishedValue> {
        self.bus.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_bus() {
        let page = PageState::new();
        let handle = page.clone();

        handle.bus.publish("sku-count", 1234.0);

        assert_eq!(page.published("sku-count"), Some(1234.0));
        assert_eq!(page.published_values().len(), 1);
    }
}
