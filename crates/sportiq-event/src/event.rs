//! The unified runtime event type.

use crate::{ErrorRecord, Stage, StateChange};
use serde::{Deserialize, Serialize};
use sportiq_types::{LayerId, LayerStatus, MissingDependency};

/// Every notification the runtime broadcasts on its event bus.
///
/// Events are fire-and-forget: emitters never wait for subscribers, and
/// subscribers that lag may miss events (broadcast-channel semantics).
/// Nothing in the runtime's own control flow depends on event delivery.
///
/// # Example
///
/// ```
/// use sportiq_event::{RuntimeEvent, StateChange};
/// use serde_json::json;
///
/// let ev = RuntimeEvent::StateChange(StateChange::new("nav:ready", json!(true)));
/// match ev {
///     RuntimeEvent::StateChange(change) => assert_eq!(change.key, "nav:ready"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RuntimeEvent {
    /// The runtime core moved to a new lifecycle stage.
    StageChanged { stage: Stage },

    /// The runtime core reached `Ready`.
    Ready,

    /// A key in the global state map was written.
    StateChange(StateChange),

    /// An error was captured by `log_error` or the error boundary.
    Error(ErrorRecord),

    /// A layer was added to the registry.
    LayerRegistered { id: LayerId },

    /// A layer's status changed (edge-triggered: only emitted on an actual
    /// transition, never re-emitted for an unchanged status).
    LayerStatusChanged {
        id: LayerId,
        from: LayerStatus,
        to: LayerStatus,
    },

    /// An `enable` call was refused because dependencies are unsatisfied.
    DependencyError {
        id: LayerId,
        missing: Vec<MissingDependency>,
    },
}
