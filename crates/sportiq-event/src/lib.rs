//! Event system for the SPORTIQ layer runtime.
//!
//! Every cross-layer notification in the runtime flows through one typed
//! enum, [`RuntimeEvent`], broadcast on the runtime core's event bus.
//! Payloads are checked at compile time; there are no stringly-typed event
//! names to mistype.
//!
//! # Event Flow
//!
//! ```text
//! ┌──────────────┐  set_state / log_error  ┌──────────────────┐
//! │ RuntimeCore  │ ───────────────────────►│  broadcast bus    │
//! └──────────────┘                         └──────────────────┘
//!        ▲                                         │
//!        │ register / enable / poll                ▼
//! ┌──────────────┐                         ┌──────────────────┐
//! │ LayerManager │                         │  any subscriber   │
//! └──────────────┘                         └──────────────────┘
//! ```
//!
//! # Message Types
//!
//! | Event | Emitted by | When |
//! |-------|-----------|------|
//! | [`RuntimeEvent::StageChanged`] | core | lifecycle transition |
//! | [`RuntimeEvent::Ready`] | core | runtime reaches `Ready` |
//! | [`RuntimeEvent::StateChange`] | core | `set_state` |
//! | [`RuntimeEvent::Error`] | core | `log_error` / error boundary |
//! | [`RuntimeEvent::LayerRegistered`] | manager | `register` |
//! | [`RuntimeEvent::LayerStatusChanged`] | manager/health/orchestrator | edge-triggered status change |
//! | [`RuntimeEvent::DependencyError`] | manager | refused `enable` |
//!
//! Delivery is fire-and-forget: the bus never blocks an emitter, and a bus
//! with no subscribers drops events silently.

mod event;
mod record;
mod stage;

pub use event::RuntimeEvent;
pub use record::{now_millis, ErrorRecord, StateChange};
pub use stage::{EventError, LoadPhase, Stage};

// Re-export shared vocabulary for convenience
pub use sportiq_types::{LayerId, LayerStatus, MissingDependency};
