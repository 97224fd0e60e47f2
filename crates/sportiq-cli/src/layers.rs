//! Builtin demo layers for smoke activation.
//!
//! Real portal layers live in the host application; these exist so `sportiq
//! run` can exercise a manifest end to end without portal code. Point a
//! descriptor's `entry` at `"noop"` or `"echo"` and it will load.

use serde_json::json;
use sportiq_layer::{Layer, LayerContext, LayerError};
use sportiq_runtime::LayerFactories;
use sportiq_types::LayerId;

/// Does nothing on init. Useful for testing ordering and hooks.
pub struct NoopLayer {
    id: LayerId,
}

impl NoopLayer {
    #[must_use]
    pub fn new(id: impl Into<LayerId>) -> Self {
        Self { id: id.into() }
    }
}

impl Layer for NoopLayer {
    fn id(&self) -> &LayerId {
        &self.id
    }

    fn init(&mut self, _ctx: &mut LayerContext<'_>) -> Result<(), LayerError> {
        Ok(())
    }
}

/// Publishes a readiness key and mirrors its config into the state map.
pub struct EchoLayer {
    id: LayerId,
}

impl EchoLayer {
    #[must_use]
    pub fn new(id: impl Into<LayerId>) -> Self {
        Self { id: id.into() }
    }
}

impl Layer for EchoLayer {
    fn id(&self) -> &LayerId {
        &self.id
    }

    fn init(&mut self, ctx: &mut LayerContext<'_>) -> Result<(), LayerError> {
        let name = self.id.as_str();
        ctx.runtime.set_state(&format!("{name}:ready"), json!(true));
        ctx.runtime
            .set_state(&format!("{name}:config"), ctx.config.clone());
        Ok(())
    }
}

/// Factory table exposing the builtin demo layers.
#[must_use]
pub fn builtin_factories() -> LayerFactories {
    LayerFactories::new()
        .with("noop", || Box::new(NoopLayer::new("noop")))
        .with("echo", || Box::new(EchoLayer::new("echo")))
}
