//! Layer manifest handling for the SPORTIQ runtime.
//!
//! The manifest is the JSON document that declares which portal layers
//! exist, how they depend on each other, and which are staged but not yet
//! active. This crate owns the whole pipeline from file to validated,
//! indexed document:
//!
//! ```text
//! ┌──────────────┐   read    ┌──────────────┐  validate  ┌───────────────────┐
//! │ manifest.json│ ────────► │ serde_json   │ ─────────► │ ValidatedManifest │
//! │  (on disk)   │           │   ::Value    │            │  (typed + index)  │
//! └──────────────┘           └──────────────┘            └───────────────────┘
//! ```
//!
//! Validation runs against the raw JSON before typed deserialization so
//! errors can name the exact offending field (`layers.active[2].entry`)
//! instead of surfacing a serde type mismatch.
//!
//! [`ManifestLoader`] caches the validated result: the file is read at most
//! once per loader, and concurrent first loads coalesce into a single read.

mod doc;
mod error;
mod loader;
mod validate;

pub use doc::{LayerLists, ManifestDoc, ValidatedManifest};
pub use error::ManifestError;
pub use loader::ManifestLoader;
pub use validate::validate;
