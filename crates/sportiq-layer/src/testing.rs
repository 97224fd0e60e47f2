//! Test doubles for Layer implementations.
//!
//! Provides small layers for exercising the orchestrator and manager
//! without real portal features: a state-publishing layer, a failing
//! layer, and an init-counting layer for load-coalescing assertions.
//!
//! # Example
//!
//! ```
//! use sportiq_layer::testing::{CountingLayer, FailingLayer, PublishingLayer};
//! use sportiq_layer::{Layer, LayerContext, RuntimeHandle};
//! use serde_json::{json, Value};
//! use std::sync::atomic::Ordering;
//!
//! struct NullRuntime;
//! impl RuntimeHandle for NullRuntime {
//!     fn set_state(&self, _k: &str, _v: Value) {}
//!     fn get_state(&self, _k: &str) -> Option<Value> { None }
//!     fn log_error(&self, _m: &str, _s: &str) {}
//! }
//!
//! let mut layer = CountingLayer::new("ticker");
//! let counter = layer.init_count.clone();
//! let rt = NullRuntime;
//! let mut ctx = LayerContext::new(&rt, json!({}));
//! layer.init(&mut ctx).unwrap();
//! assert_eq!(counter.load(Ordering::SeqCst), 1);
//! ```

use crate::{Layer, LayerContext, LayerError};
use serde_json::json;
use sportiq_types::LayerId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Publishes the given state keys on init.
pub struct PublishingLayer {
    id: LayerId,
    keys: Vec<String>,
}

impl PublishingLayer {
    /// Creates a layer that publishes `keys` with value `true`.
    #[must_use]
    pub fn new(id: impl Into<LayerId>, keys: Vec<String>) -> Self {
        Self {
            id: id.into(),
            keys,
        }
    }
}

impl Layer for PublishingLayer {
    fn id(&self) -> &LayerId {
        &self.id
    }

    fn init(&mut self, ctx: &mut LayerContext<'_>) -> Result<(), LayerError> {
        for key in &self.keys {
            ctx.runtime.set_state(key, json!(true));
        }
        Ok(())
    }
}

/// Always fails to initialize.
pub struct FailingLayer {
    id: LayerId,
    message: String,
}

impl FailingLayer {
    /// Creates a layer whose init fails with `message`.
    #[must_use]
    pub fn new(id: impl Into<LayerId>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

impl Layer for FailingLayer {
    fn id(&self) -> &LayerId {
        &self.id
    }

    fn init(&mut self, _ctx: &mut LayerContext<'_>) -> Result<(), LayerError> {
        Err(LayerError::InitFailed(self.message.clone()))
    }
}

/// Counts how many times `init` runs.
///
/// Share `init_count` before handing the layer to a factory to assert the
/// at-most-one-load property.
pub struct CountingLayer {
    id: LayerId,
    /// Number of completed `init` calls.
    pub init_count: Arc<AtomicUsize>,
}

impl CountingLayer {
    /// Creates a counting layer with a fresh counter.
    #[must_use]
    pub fn new(id: impl Into<LayerId>) -> Self {
        Self {
            id: id.into(),
            init_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a counting layer sharing an existing counter.
    #[must_use]
    pub fn with_counter(id: impl Into<LayerId>, counter: Arc<AtomicUsize>) -> Self {
        Self {
            id: id.into(),
            init_count: counter,
        }
    }
}

impl Layer for CountingLayer {
    fn id(&self) -> &LayerId {
        &self.id
    }

    fn init(&mut self, _ctx: &mut LayerContext<'_>) -> Result<(), LayerError> {
        self.init_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuntimeHandle;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRuntime {
        state: Mutex<HashMap<String, Value>>,
    }

    impl RuntimeHandle for FakeRuntime {
        fn set_state(&self, key: &str, value: Value) {
            self.state.lock().unwrap().insert(key.to_string(), value);
        }
        fn get_state(&self, key: &str) -> Option<Value> {
            self.state.lock().unwrap().get(key).cloned()
        }
        fn log_error(&self, _message: &str, _source: &str) {}
    }

    #[test]
    fn publishing_layer_writes_keys() {
        let rt = FakeRuntime::default();
        let mut layer = PublishingLayer::new("nav", vec!["nav:ready".into()]);
        let mut ctx = LayerContext::new(&rt, json!({}));
        layer.init(&mut ctx).unwrap();
        assert_eq!(rt.get_state("nav:ready"), Some(json!(true)));
    }

    #[test]
    fn failing_layer_fails() {
        let rt = FakeRuntime::default();
        let mut layer = FailingLayer::new("broken", "no backend");
        let mut ctx = LayerContext::new(&rt, json!({}));
        let err = layer.init(&mut ctx).unwrap_err();
        assert!(err.to_string().contains("no backend"));
    }

    #[test]
    fn counting_layer_counts() {
        let rt = FakeRuntime::default();
        let mut layer = CountingLayer::new("ticker");
        let counter = layer.init_count.clone();
        let mut ctx = LayerContext::new(&rt, json!({}));
        layer.init(&mut ctx).unwrap();
        layer.init(&mut ctx).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
