//! Runtime error types: per-layer load failures and registry errors.

use sportiq_types::{ErrorCode, LayerId};
use thiserror::Error;

/// Errors raised while loading a single layer.
///
/// Load errors never escape the activation loop; the orchestrator funnels
/// them into the error boundary, marks the layer `Failed`, and continues
/// with the next layer.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `UnknownLayer` | `LOAD_UNKNOWN_LAYER` | no |
/// | `UnknownEntry` | `LOAD_UNKNOWN_ENTRY` | no |
/// | `InitFailed` | `LOAD_INIT_FAILED` | yes |
/// | `Timeout` | `LOAD_TIMEOUT` | yes |
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// No descriptor for this id in the registry.
    #[error("layer '{0}' is not registered")]
    UnknownLayer(LayerId),

    /// The descriptor's `entry` key matches no registered factory.
    #[error("layer '{id}' names unknown entry '{entry}'")]
    UnknownEntry { id: LayerId, entry: String },

    /// The layer's `init` returned an error.
    #[error("layer '{id}' failed to initialize: {message}")]
    InitFailed { id: LayerId, message: String },

    /// Loading exceeded the configured bound.
    #[error("layer '{id}' timed out after {timeout_ms}ms")]
    Timeout { id: LayerId, timeout_ms: u64 },
}

impl ErrorCode for LoadError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownLayer(_) => "LOAD_UNKNOWN_LAYER",
            Self::UnknownEntry { .. } => "LOAD_UNKNOWN_ENTRY",
            Self::InitFailed { .. } => "LOAD_INIT_FAILED",
            Self::Timeout { .. } => "LOAD_TIMEOUT",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::InitFailed { .. } | Self::Timeout { .. })
    }
}

/// Errors raised by registry mutations.
#[derive(Debug, Clone, Error)]
pub enum ManagerError {
    /// A descriptor with this id is already registered.
    #[error("layer '{0}' is already registered")]
    DuplicateLayer(LayerId),

    /// No descriptor for this id.
    #[error("layer '{0}' is not registered")]
    UnknownLayer(LayerId),
}

impl ErrorCode for ManagerError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateLayer(_) => "MANAGER_DUPLICATE_LAYER",
            Self::UnknownLayer(_) => "MANAGER_UNKNOWN_LAYER",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
