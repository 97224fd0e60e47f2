//! The Layer trait.

use crate::{LayerContext, LayerError};
use sportiq_types::LayerId;

/// A boxed layer as produced by a factory.
pub type BoxedLayer = Box<dyn Layer>;

/// One orchestrated feature unit.
///
/// Layers are constructed by a registered factory, initialized exactly once
/// by the orchestrator, and shut down when the host tears the runtime down.
/// A layer with nothing to do in `init` is loaded for side effects of its
/// construction alone.
///
/// # Contract
///
/// - `init` is called at most once, after all of the layer's dependencies
///   (per the resolved load order) have been activated.
/// - A failed `init` marks only this layer as failed; the orchestrator
///   continues with the remaining layers.
/// - Layers publish their presence by writing the state keys declared in
///   their descriptor's `provides` list; health polling derives
///   active/inactive from those keys.
///
/// # Thread Safety
///
/// Layers must be `Send + Sync`; the runtime may inspect them from its
/// health task while the orchestrator owns them.
pub trait Layer: Send + Sync {
    /// Returns the layer's identifier.
    fn id(&self) -> &LayerId;

    /// Initializes the layer with the injected runtime handle and its
    /// configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError`] on failure; the orchestrator logs it, marks
    /// the layer failed, and moves on.
    fn init(&mut self, ctx: &mut LayerContext<'_>) -> Result<(), LayerError>;

    /// Shuts the layer down.
    ///
    /// Default implementation does nothing.
    fn shutdown(&mut self) {
        // Default: no-op
    }
}
