//! Hook registry — fault-isolated callback dispatch.
//!
//! One registry serves both hook families: the runtime core keys its
//! registry by [`Stage`](sportiq_event::Stage), the orchestrator keys its
//! registry by [`LoadPhase`](sportiq_event::LoadPhase).
//!
//! # Concurrency
//!
//! The registry holds its own `std::sync::RwLock`; `on()` takes a write
//! lock, `dispatch()` snapshots the callbacks under a read lock and
//! invokes them after releasing it, so a hook may register further hooks
//! without deadlocking.
//!
//! # Fault isolation
//!
//! A failing hook never stops the chain. Dispatch collects failures and
//! returns them for the caller to route into the error boundary.

use sportiq_types::LayerId;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Data handed to every hook invocation.
#[derive(Debug, Clone, Default)]
pub struct HookPayload {
    /// The layer being processed, when the hook point concerns one.
    pub layer: Option<LayerId>,
    /// Free-form detail, e.g. the error message at an error hook point.
    pub detail: Option<String>,
}

impl HookPayload {
    /// Payload for a per-layer hook point.
    #[must_use]
    pub fn for_layer(id: &LayerId) -> Self {
        Self {
            layer: Some(id.clone()),
            detail: None,
        }
    }

    /// Attaches detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// One hook failure, reported back to the dispatcher's caller.
#[derive(Debug, Clone)]
pub struct HookFailure {
    /// The registered hook name.
    pub hook: String,
    /// The error message the hook returned.
    pub message: String,
}

type HookFn = Arc<dyn Fn(&HookPayload) -> Result<(), String> + Send + Sync>;

struct NamedHook {
    name: String,
    callback: HookFn,
}

/// Registry of named callbacks keyed by hook point.
///
/// Hooks run in registration order. There is no priority system; portal
/// layers that need ordering register in the order they need.
pub struct HookRegistry<P> {
    hooks: RwLock<HashMap<P, Vec<NamedHook>>>,
}

impl<P: Eq + Hash + Clone + Display> HookRegistry<P> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `callback` under `name` at `point`.
    pub fn on<F>(&self, point: P, name: impl Into<String>, callback: F)
    where
        F: Fn(&HookPayload) -> Result<(), String> + Send + Sync + 'static,
    {
        let mut hooks = self.hooks.write().expect("lock poisoned");
        hooks.entry(point).or_default().push(NamedHook {
            name: name.into(),
            callback: Arc::new(callback),
        });
    }

    /// Number of hooks registered across all points.
    #[must_use]
    pub fn len(&self) -> usize {
        let hooks = self.hooks.read().expect("lock poisoned");
        hooks.values().map(Vec::len).sum()
    }

    /// Returns `true` if no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes every hook at `point` in registration order.
    ///
    /// Failures are logged and collected; they never interrupt the chain
    /// and never propagate as panics or errors.
    pub fn dispatch(&self, point: &P, payload: &HookPayload) -> Vec<HookFailure> {
        let snapshot: Vec<(String, HookFn)> = {
            let hooks = self.hooks.read().expect("lock poisoned");
            match hooks.get(point) {
                Some(list) => list
                    .iter()
                    .map(|h| (h.name.clone(), h.callback.clone()))
                    .collect(),
                None => return Vec::new(),
            }
        };

        let mut failures = Vec::new();
        for (name, callback) in snapshot {
            if let Err(message) = callback(payload) {
                warn!(point = %point, hook = %name, %message, "hook failed");
                failures.push(HookFailure {
                    hook: name,
                    message,
                });
            }
        }
        failures
    }
}

impl<P: Eq + Hash + Clone + Display> Default for HookRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
