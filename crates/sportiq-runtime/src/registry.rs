//! Layer registry — the single source of truth for descriptors and status.
//!
//! Both the orchestrator and the layer manager operate on this registry,
//! so there is exactly one view of which layers exist, whether they are
//! enabled, and what status they hold. Dependency questions are answered
//! by deriving a [`DependencyGraph`] from the registered descriptors.
//!
//! # Concurrency
//!
//! Wrapped in `Arc<std::sync::RwLock<LayerRegistry>>` (see
//! [`SharedRegistry`]): reads take the read lock, registration and status
//! changes take the write lock. Locks are never held across await points.

use crate::error::ManagerError;
use sportiq_graph::DependencyGraph;
use sportiq_layer::LayerDescriptor;
use sportiq_types::{LayerId, LayerStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared handle to the registry.
pub type SharedRegistry = Arc<RwLock<LayerRegistry>>;

/// Insertion-ordered store of layer descriptors and their statuses.
#[derive(Default)]
pub struct LayerRegistry {
    descriptors: Vec<LayerDescriptor>,
    index: HashMap<LayerId, usize>,
    statuses: HashMap<LayerId, LayerStatus>,
}

impl LayerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry behind the shared lock.
    #[must_use]
    pub fn shared() -> SharedRegistry {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Registers a descriptor with an initial status.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::DuplicateLayer`] if the id is taken.
    pub fn register(
        &mut self,
        descriptor: LayerDescriptor,
        status: LayerStatus,
    ) -> Result<(), ManagerError> {
        if self.index.contains_key(&descriptor.id) {
            return Err(ManagerError::DuplicateLayer(descriptor.id));
        }
        let id = descriptor.id.clone();
        self.index.insert(id.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
        self.statuses.insert(id, status);
        Ok(())
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &LayerId) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up a descriptor.
    #[must_use]
    pub fn get(&self, id: &LayerId) -> Option<&LayerDescriptor> {
        self.index.get(id).map(|&i| &self.descriptors[i])
    }

    /// All descriptors, in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[LayerDescriptor] {
        &self.descriptors
    }

    /// Descriptors in the given category, in registration order.
    #[must_use]
    pub fn layers_by_category(&self, category: &str) -> Vec<&LayerDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Current status of `id`; unregistered ids report `Unknown`.
    #[must_use]
    pub fn status(&self, id: &LayerId) -> LayerStatus {
        self.statuses.get(id).copied().unwrap_or(LayerStatus::Unknown)
    }

    /// Sets the status of `id`, returning the previous status when it
    /// actually changed (`None` means no edge, so no event should fire).
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownLayer`] if the id is unregistered.
    pub fn set_status(
        &mut self,
        id: &LayerId,
        status: LayerStatus,
    ) -> Result<Option<LayerStatus>, ManagerError> {
        let current = self
            .statuses
            .get_mut(id)
            .ok_or_else(|| ManagerError::UnknownLayer(id.clone()))?;
        if *current == status {
            return Ok(None);
        }
        let previous = *current;
        *current = status;
        Ok(Some(previous))
    }

    /// Flips the `enabled` flag on a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownLayer`] if the id is unregistered.
    pub fn set_enabled(&mut self, id: &LayerId, enabled: bool) -> Result<(), ManagerError> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| ManagerError::UnknownLayer(id.clone()))?;
        self.descriptors[i].enabled = enabled;
        Ok(())
    }

    /// Builds the dependency graph over all registered descriptors.
    #[must_use]
    pub fn graph(&self) -> DependencyGraph {
        DependencyGraph::from_descriptors(&self.descriptors)
    }

    /// Number of registered layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
