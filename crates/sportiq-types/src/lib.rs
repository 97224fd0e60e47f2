//! Core types for the SPORTIQ layer runtime.
//!
//! This crate provides the foundational vocabulary shared by every other
//! crate in the workspace.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Layer SDK                                │
//! │  (safe for layer implementations to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  sportiq-types  : LayerId, LayerStatus, ErrorCode  ◄── HERE  │
//! │  sportiq-event  : RuntimeEvent, ErrorRecord, stages          │
//! │  sportiq-layer  : Layer trait, LayerDescriptor               │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Runtime Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  sportiq-graph    : dependency graph + topological sort      │
//! │  sportiq-manifest : manifest loading + validation            │
//! │  sportiq-runtime  : core, orchestrator, manager, health      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! A [`LayerId`] is the human-readable id declared in the layer manifest
//! (e.g. `"comment-widgets"`). Each id additionally carries a deterministic
//! UUID v5 derived from the name, so equal ids are equal values across
//! processes without coordination.
//!
//! # Example
//!
//! ```
//! use sportiq_types::{LayerId, LayerStatus};
//!
//! let a = LayerId::new("comment-widgets");
//! let b = LayerId::new("comment-widgets");
//! assert_eq!(a, b); // same name, same UUID
//!
//! assert!(LayerStatus::Active.is_active());
//! ```

mod dependency;
mod error;
mod id;
mod status;

pub use dependency::{DependencyReport, MissingDependency, MissingReason};
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::LayerId;
pub use status::LayerStatus;
