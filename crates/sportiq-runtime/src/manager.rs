//! Layer manager: registration, dependency gating, enable/disable.
//!
//! The manager answers "may this layer run?" questions against the same
//! shared registry the orchestrator loads from, so both always agree on
//! which layers exist and what state they are in.
//!
//! # Dependency reports
//!
//! [`LayerManager::check_dependencies`] evaluates every declared
//! dependency and reports every gap at once — a layer author fixing a
//! manifest sees all problems in one pass, not one per attempt.

use crate::config::{DisablePolicy, SportiqConfig};
use crate::core::RuntimeCore;
use crate::error::ManagerError;
use crate::registry::SharedRegistry;
use sportiq_event::RuntimeEvent;
use sportiq_graph::SortResult;
use sportiq_layer::LayerDescriptor;
use sportiq_types::{
    DependencyReport, LayerId, LayerStatus, MissingDependency, MissingReason,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Derives a freshly registered layer's status from its published state
/// keys: all keys present means the layer is already active (e.g. set up
/// by server-side rendering), none declared means status is unknowable.
pub(crate) fn initial_status(core: &RuntimeCore, descriptor: &LayerDescriptor) -> LayerStatus {
    if descriptor.provides.is_empty() {
        return LayerStatus::Unknown;
    }
    if descriptor.provides.iter().all(|key| core.has_state(key)) {
        LayerStatus::Active
    } else {
        LayerStatus::Inactive
    }
}

/// Applies a status change and broadcasts the edge, if there is one.
///
/// No event fires when the status is unchanged; callers rely on this for
/// edge-triggered health reporting.
pub(crate) fn transition_status(
    core: &RuntimeCore,
    registry: &SharedRegistry,
    id: &LayerId,
    status: LayerStatus,
) {
    let changed = {
        let mut registry = registry.write().expect("lock poisoned");
        registry.set_status(id, status)
    };
    match changed {
        Ok(Some(previous)) => {
            debug!(layer = %id, from = %previous, to = %status, "status changed");
            core.publish(RuntimeEvent::LayerStatusChanged {
                id: id.clone(),
                from: previous,
                to: status,
            });
        }
        Ok(None) => {}
        Err(err) => debug!(layer = %id, %err, "status change for unknown layer"),
    }
}

/// Enable/disable and dependency gatekeeper over the shared registry.
#[derive(Clone)]
pub struct LayerManager {
    core: Arc<RuntimeCore>,
    registry: SharedRegistry,
    disable_policy: DisablePolicy,
}

impl LayerManager {
    /// Creates a manager over the shared core and registry.
    #[must_use]
    pub fn new(core: Arc<RuntimeCore>, registry: SharedRegistry, config: &SportiqConfig) -> Self {
        Self {
            core,
            registry,
            disable_policy: config.manager.disable_policy,
        }
    }

    /// Registers a layer, deriving its initial status from the presence
    /// of its `provides` keys, and broadcasts `LayerRegistered`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::DuplicateLayer`] if the id is taken.
    pub fn register(&self, descriptor: LayerDescriptor) -> Result<(), ManagerError> {
        let id = descriptor.id.clone();
        let status = initial_status(&self.core, &descriptor);
        {
            let mut registry = self.registry.write().expect("lock poisoned");
            registry.register(descriptor, status)?;
        }
        debug!(layer = %id, %status, "layer registered");
        self.core.publish(RuntimeEvent::LayerRegistered { id });
        Ok(())
    }

    /// Current status of a layer.
    #[must_use]
    pub fn status(&self, id: &LayerId) -> LayerStatus {
        self.registry.read().expect("lock poisoned").status(id)
    }

    /// Evaluates every dependency of `id` and reports every gap.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownLayer`] if `id` is unregistered.
    pub fn check_dependencies(&self, id: &LayerId) -> Result<DependencyReport, ManagerError> {
        let registry = self.registry.read().expect("lock poisoned");
        let descriptor = registry
            .get(id)
            .ok_or_else(|| ManagerError::UnknownLayer(id.clone()))?;

        let mut missing = Vec::new();
        for dep in &descriptor.dependencies {
            let reason = match registry.get(dep) {
                None => Some(MissingReason::NotRegistered),
                Some(d) if !d.enabled => Some(MissingReason::Disabled),
                Some(_) if !registry.status(dep).is_active() => Some(MissingReason::NotActive),
                Some(_) => None,
            };
            if let Some(reason) = reason {
                missing.push(MissingDependency {
                    id: dep.clone(),
                    reason,
                });
            }
        }

        Ok(if missing.is_empty() {
            DependencyReport::satisfied()
        } else {
            DependencyReport::with_missing(missing)
        })
    }

    /// Enables a layer if all its dependencies are active.
    ///
    /// On refusal the gaps are broadcast as a `DependencyError` event and
    /// `false` is returned; the layer stays as it was.
    pub fn enable(&self, id: &LayerId) -> bool {
        let report = match self.check_dependencies(id) {
            Ok(report) => report,
            Err(err) => {
                warn!(layer = %id, %err, "enable refused");
                return false;
            }
        };

        if !report.satisfied {
            warn!(layer = %id, gaps = report.missing.len(), "enable refused, dependencies unsatisfied");
            self.core.publish(RuntimeEvent::DependencyError {
                id: id.clone(),
                missing: report.missing,
            });
            return false;
        }

        let mut registry = self.registry.write().expect("lock poisoned");
        registry.set_enabled(id, true).is_ok()
    }

    /// Disables a layer.
    ///
    /// With [`DisablePolicy::Warn`] active dependents are logged but left
    /// alone; with [`DisablePolicy::Cascade`] they are disabled
    /// transitively. Returns `false` for an unregistered id.
    pub fn disable(&self, id: &LayerId) -> bool {
        if !self.registry.read().expect("lock poisoned").contains(id) {
            warn!(layer = %id, "disable of unknown layer ignored");
            return false;
        }

        let active_dependents: Vec<LayerId> = self
            .dependents(id)
            .into_iter()
            .filter(|d| self.status(d).is_active())
            .collect();

        match self.disable_policy {
            DisablePolicy::Warn => {
                if !active_dependents.is_empty() {
                    let names: Vec<&str> =
                        active_dependents.iter().map(LayerId::as_str).collect();
                    warn!(
                        layer = %id,
                        dependents = ?names,
                        "disabling layer with active dependents"
                    );
                }
                self.disable_one(id);
            }
            DisablePolicy::Cascade => {
                self.disable_one(id);
                // Walk the reverse edges transitively
                let mut queue = active_dependents;
                while let Some(next) = queue.pop() {
                    debug!(layer = %next, cause = %id, "cascading disable");
                    self.disable_one(&next);
                    queue.extend(
                        self.dependents(&next)
                            .into_iter()
                            .filter(|d| self.status(d).is_active()),
                    );
                }
            }
        }
        true
    }

    fn disable_one(&self, id: &LayerId) {
        {
            let mut registry = self.registry.write().expect("lock poisoned");
            if registry.set_enabled(id, false).is_err() {
                return;
            }
        }
        transition_status(&self.core, &self.registry, id, LayerStatus::Inactive);
    }

    /// Layers that declare `id` as a dependency.
    #[must_use]
    pub fn dependents(&self, id: &LayerId) -> Vec<LayerId> {
        let registry = self.registry.read().expect("lock poisoned");
        registry.graph().dependents(id).unwrap_or_default()
    }

    /// Topological load order over the registered layers, with cycles
    /// reported and excluded.
    #[must_use]
    pub fn resolve_load_order(&self) -> SortResult {
        let registry = self.registry.read().expect("lock poisoned");
        registry.graph().resolve_order()
    }
}
