//! Initialization context handed to every layer.
//!
//! Layers never discover the runtime through a global lookup; the runtime
//! core is injected through [`LayerContext`] at init time. The
//! [`RuntimeHandle`] trait is the seam that keeps this SDK crate free of a
//! dependency on the runtime implementation.

use serde_json::Value;

/// The runtime surface a layer is allowed to touch.
///
/// Implemented by the runtime core. Everything here is infallible by
/// contract: state writes always succeed and `log_error` never throws —
/// the runtime's error boundary swallows everything.
pub trait RuntimeHandle: Send + Sync {
    /// Writes a key into the global state map and broadcasts a
    /// state-change notification.
    fn set_state(&self, key: &str, value: Value);

    /// Reads a key from the global state map. `None` if absent.
    fn get_state(&self, key: &str) -> Option<Value>;

    /// Appends a structured error record and broadcasts an error
    /// notification. Never fails.
    fn log_error(&self, message: &str, source: &str);
}

/// Context passed to [`Layer::init`](crate::Layer::init).
///
/// Carries the injected runtime handle and the layer's own configuration
/// document (empty object when the layer declares no config or its config
/// file could not be fetched — config absence is non-fatal by contract).
pub struct LayerContext<'a> {
    /// The runtime core, injected rather than globally discovered.
    pub runtime: &'a dyn RuntimeHandle,
    /// Per-layer configuration document.
    pub config: Value,
}

impl<'a> LayerContext<'a> {
    /// Creates a context with the given runtime handle and config.
    #[must_use]
    pub fn new(runtime: &'a dyn RuntimeHandle, config: Value) -> Self {
        Self { runtime, config }
    }
}
