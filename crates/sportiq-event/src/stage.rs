//! Lifecycle stages and load phases.
//!
//! Two independent hook keyspaces exist in the runtime:
//!
//! - [`Stage`]: the process-wide lifecycle of the runtime core
//! - [`LoadPhase`]: the per-layer load sequence of the orchestrator
//!
//! Both are typed enums; the only place an unrecognized name can appear is
//! at a string boundary (config, CLI), where [`FromStr`](std::str::FromStr)
//! returns an [`EventError`] that callers log and ignore.

use serde::{Deserialize, Serialize};
use sportiq_types::ErrorCode;
use thiserror::Error;

/// Process-wide lifecycle stage of the runtime core.
///
/// ```text
/// Pending →(boot)→ Booting → Initializing →(host ready)→ Ready
/// ```
///
/// `Ready` is terminal in practice; `Destroyed` is reserved for hosts that
/// tear the runtime down explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Initial stage before `boot()` is called.
    #[default]
    Pending,

    /// Boot hooks are running.
    Booting,

    /// Init hooks have run; waiting on the host readiness signal.
    Initializing,

    /// The runtime is fully up; layers may be activated.
    Ready,

    /// Reserved terminal stage.
    Destroyed,
}

impl Stage {
    /// Returns `true` for stages with no outgoing transition.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Destroyed)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Booting => write!(f, "booting"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
            Self::Destroyed => write!(f, "destroyed"),
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "booting" => Ok(Self::Booting),
            "initializing" => Ok(Self::Initializing),
            "ready" => Ok(Self::Ready),
            "destroyed" => Ok(Self::Destroyed),
            other => Err(EventError::InvalidStage(other.to_string())),
        }
    }
}

/// Hook point in the orchestrator's per-layer load sequence.
///
/// ```text
/// BeforeLoad → (construct) → OnLoad → (config + init) → AfterLoad
///                                  \→ OnError (any failure)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadPhase {
    /// Before the layer is constructed.
    BeforeLoad,
    /// After construction, before initialization.
    OnLoad,
    /// After successful initialization.
    AfterLoad,
    /// Any failure during the load sequence.
    OnError,
}

impl std::fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BeforeLoad => write!(f, "beforeLoad"),
            Self::OnLoad => write!(f, "onLoad"),
            Self::AfterLoad => write!(f, "afterLoad"),
            Self::OnError => write!(f, "onError"),
        }
    }
}

impl std::str::FromStr for LoadPhase {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beforeLoad" => Ok(Self::BeforeLoad),
            "onLoad" => Ok(Self::OnLoad),
            "afterLoad" => Ok(Self::AfterLoad),
            "onError" => Ok(Self::OnError),
            other => Err(EventError::InvalidPhase(other.to_string())),
        }
    }
}

/// Event system error.
#[derive(Debug, Clone, Error)]
pub enum EventError {
    /// Unrecognized lifecycle stage name.
    #[error("unrecognized lifecycle stage: '{0}'")]
    InvalidStage(String),

    /// Unrecognized load phase name.
    #[error("unrecognized load phase: '{0}'")]
    InvalidPhase(String),
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidStage(_) => "EVENT_INVALID_STAGE",
            Self::InvalidPhase(_) => "EVENT_INVALID_PHASE",
        }
    }

    fn is_recoverable(&self) -> bool {
        // A bad name stays bad on retry
        false
    }
}
