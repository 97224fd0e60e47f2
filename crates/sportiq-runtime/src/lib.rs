//! SPORTIQ runtime: lifecycle, orchestration, layer management, health.
//!
//! # Architecture
//!
//! ```text
//!                       ┌───────────────────┐
//!                       │   RuntimeCore     │  lifecycle stages, state map,
//!                       │  (Arc, shared)    │  event bus, error boundary
//!                       └───────┬───────────┘
//!               ┌───────────────┼───────────────────┐
//!               │               │                   │
//!      ┌────────▼───────┐ ┌─────▼──────────┐ ┌──────▼────────┐
//!      │  Orchestrator  │ │  LayerManager  │ │ HealthMonitor │
//!      │  activate_all  │ │ enable/disable │ │  poll_once    │
//!      │  load_layer    │ │ check deps     │ │  run loop     │
//!      └────────┬───────┘ └─────┬──────────┘ └──────┬────────┘
//!               │               │                   │
//!               └───────► SharedRegistry ◄──────────┘
//!                    (one registry, one graph view)
//! ```
//!
//! All three consumers share the same [`RuntimeCore`] and the same
//! [`registry::SharedRegistry`]; dependency questions are answered by one
//! graph derived from that registry.
//!
//! # Modules
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`core`] | Lifecycle stages, state map, event bus, error boundary |
//! | [`orchestrator`] | Manifest-driven sequential layer activation |
//! | [`manager`] | Registration, dependency gating, enable/disable |
//! | [`health`] | Periodic status derivation from published state keys |
//! | [`registry`] | Shared descriptor and status store |
//! | [`factory`] | `entry` key → layer constructor table |
//! | [`hooks`] | Fault-isolated callback dispatch |
//! | [`config`] | Layered TOML + env configuration |

pub mod config;
pub mod core;
pub mod error;
pub mod factory;
pub mod health;
pub mod hooks;
pub mod manager;
pub mod orchestrator;
pub mod registry;

pub use crate::core::RuntimeCore;
pub use config::{ConfigLoader, DisablePolicy, SportiqConfig};
pub use error::{LoadError, ManagerError};
pub use factory::LayerFactories;
pub use health::{HealthHandle, HealthMonitor};
pub use hooks::{HookFailure, HookPayload, HookRegistry};
pub use manager::LayerManager;
pub use orchestrator::{ActivationReport, LoadOutcome, Orchestrator};
pub use registry::{LayerRegistry, SharedRegistry};
