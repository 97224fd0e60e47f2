//! Layer factory table.
//!
//! The manifest's `entry` key is resolved against this table at load time.
//! Factories are registered up front by the host binary; there is no
//! dynamic code loading, which keeps the resolvable set auditable.

use sportiq_layer::BoxedLayer;
use std::collections::HashMap;

type FactoryFn = Box<dyn Fn() -> BoxedLayer + Send + Sync>;

/// Registry mapping manifest `entry` keys to layer constructors.
#[derive(Default)]
pub struct LayerFactories {
    factories: HashMap<String, FactoryFn>,
}

impl LayerFactories {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `entry`. A repeated key replaces the
    /// previous factory.
    pub fn register<F>(&mut self, entry: impl Into<String>, factory: F)
    where
        F: Fn() -> BoxedLayer + Send + Sync + 'static,
    {
        self.factories.insert(entry.into(), Box::new(factory));
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with<F>(mut self, entry: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> BoxedLayer + Send + Sync + 'static,
    {
        self.register(entry, factory);
        self
    }

    /// Returns `true` if `entry` resolves.
    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        self.factories.contains_key(entry)
    }

    /// Constructs a fresh layer instance for `entry`.
    #[must_use]
    pub fn create(&self, entry: &str) -> Option<BoxedLayer> {
        self.factories.get(entry).map(|f| f())
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no factories are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportiq_layer::testing::PublishingLayer;
    use sportiq_layer::Layer;
    use sportiq_types::LayerId;

    #[test]
    fn create_resolves_entry() {
        let factories = LayerFactories::new().with("ticker", || {
            Box::new(PublishingLayer::new("live-ticker", vec!["ticker:ready".into()]))
        });

        assert!(factories.contains("ticker"));
        let layer = factories.create("ticker").unwrap();
        assert_eq!(layer.id(), &LayerId::new("live-ticker"));
    }

    #[test]
    fn unknown_entry_is_none() {
        let factories = LayerFactories::new();
        assert!(factories.create("ghost").is_none());
        assert!(factories.is_empty());
    }

    #[test]
    fn each_create_is_a_fresh_instance() {
        let factories = LayerFactories::new().with("ticker", || {
            Box::new(PublishingLayer::new("live-ticker", Vec::new()))
        });

        let a = factories.create("ticker").unwrap();
        let b = factories.create("ticker").unwrap();
        let a_ptr = a.as_ref() as *const dyn Layer as *const u8;
        let b_ptr = b.as_ref() as *const dyn Layer as *const u8;
        assert_ne!(a_ptr, b_ptr);
    }
}
