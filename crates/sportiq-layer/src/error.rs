//! Layer-level errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`InitFailed`](LayerError::InitFailed) | `LAYER_INIT_FAILED` | Yes |
//! | [`InvalidConfig`](LayerError::InvalidConfig) | `LAYER_INVALID_CONFIG` | No |
//! | [`Unavailable`](LayerError::Unavailable) | `LAYER_UNAVAILABLE` | Yes |

use sportiq_types::ErrorCode;
use thiserror::Error;

/// Error returned by a layer's own lifecycle methods.
#[derive(Debug, Clone, Error)]
pub enum LayerError {
    /// Initialization failed.
    ///
    /// The orchestrator logs this, marks the layer failed, and continues
    /// with the remaining layers.
    #[error("initialization failed: {0}")]
    InitFailed(String),

    /// The layer's config document is structurally unusable.
    #[error("invalid layer config: {0}")]
    InvalidConfig(String),

    /// A resource the layer needs is temporarily unavailable.
    #[error("layer unavailable: {0}")]
    Unavailable(String),
}

impl ErrorCode for LayerError {
    fn code(&self) -> &'static str {
        match self {
            Self::InitFailed(_) => "LAYER_INIT_FAILED",
            Self::InvalidConfig(_) => "LAYER_INVALID_CONFIG",
            Self::Unavailable(_) => "LAYER_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::InitFailed(_) => true,
            Self::InvalidConfig(_) => false,
            Self::Unavailable(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportiq_types::assert_error_codes;

    fn all_variants() -> Vec<LayerError> {
        vec![
            LayerError::InitFailed("x".into()),
            LayerError::InvalidConfig("x".into()),
            LayerError::Unavailable("x".into()),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "LAYER_");
    }

    #[test]
    fn init_failed_recoverable() {
        let err = LayerError::InitFailed("missing api key".into());
        assert_eq!(err.code(), "LAYER_INIT_FAILED");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("initialization failed"));
    }

    #[test]
    fn invalid_config_not_recoverable() {
        let err = LayerError::InvalidConfig("refresh_secs must be a number".into());
        assert!(!err.is_recoverable());
    }
}
