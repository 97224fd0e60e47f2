//! Layer SDK for the SPORTIQ runtime.
//!
//! A *layer* is one feature unit of the news portal front end: a comment
//! widget, an SEO tag injector, an analytics collector. The runtime does
//! not know what a layer does; it only knows how to construct one from a
//! registered factory, initialize it with a [`LayerContext`], and track its
//! health afterwards.
//!
//! # Static factories instead of dynamic loading
//!
//! The manifest's `entry` field is a key into a factory registry resolved
//! at startup. The manifest carries metadata only, never executable paths,
//! so a hostile manifest cannot make the runtime load arbitrary code.
//!
//! # Example
//!
//! ```
//! use sportiq_layer::{Layer, LayerContext, LayerError};
//! use sportiq_types::LayerId;
//! use serde_json::json;
//!
//! struct ScoreboardLayer {
//!     id: LayerId,
//! }
//!
//! impl Layer for ScoreboardLayer {
//!     fn id(&self) -> &LayerId {
//!         &self.id
//!     }
//!
//!     fn init(&mut self, ctx: &mut LayerContext<'_>) -> Result<(), LayerError> {
//!         let refresh = ctx.config.get("refresh_secs").cloned().unwrap_or(json!(30));
//!         ctx.runtime.set_state("scoreboard:refresh", refresh);
//!         ctx.runtime.set_state("scoreboard:ready", json!(true));
//!         Ok(())
//!     }
//! }
//! ```

mod context;
mod descriptor;
mod error;
mod layer;
pub mod testing;

pub use context::{LayerContext, RuntimeHandle};
pub use descriptor::LayerDescriptor;
pub use error::LayerError;
pub use layer::{BoxedLayer, Layer};
