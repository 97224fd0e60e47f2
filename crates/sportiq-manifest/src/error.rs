//! Manifest error types.
//!
//! Every validation failure names the offending field so a manifest author
//! can fix the document without reading runtime code.

use sportiq_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating a layer manifest.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `ReadFile` | `MANIFEST_READ_FILE` | no |
/// | `ParseJson` | `MANIFEST_PARSE_JSON` | no |
/// | `NotAnObject` | `MANIFEST_NOT_AN_OBJECT` | no |
/// | `MissingField` | `MANIFEST_MISSING_FIELD` | no |
/// | `InvalidField` | `MANIFEST_INVALID_FIELD` | no |
/// | `EmptyField` | `MANIFEST_EMPTY_FIELD` | no |
/// | `DuplicateId` | `MANIFEST_DUPLICATE_ID` | no |
///
/// Manifest failures are fatal to activation but never to the host
/// process; the caller logs the error and keeps serving.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest file is not valid JSON.
    #[error("failed to parse manifest JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// The top-level JSON value is not an object.
    #[error("manifest root must be a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("manifest is missing required field '{field}'")]
    MissingField { field: String },

    /// A field has the wrong JSON type.
    #[error("manifest field '{field}' must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    /// A required string field is present but empty.
    #[error("manifest field '{field}' in {list}[{index}] must be a non-empty string")]
    EmptyField {
        field: &'static str,
        list: &'static str,
        index: usize,
    },

    /// The same layer id appears more than once.
    #[error("duplicate layer id '{id}' in manifest")]
    DuplicateId { id: String },
}

impl ErrorCode for ManifestError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "MANIFEST_READ_FILE",
            Self::ParseJson(_) => "MANIFEST_PARSE_JSON",
            Self::NotAnObject => "MANIFEST_NOT_AN_OBJECT",
            Self::MissingField { .. } => "MANIFEST_MISSING_FIELD",
            Self::InvalidField { .. } => "MANIFEST_INVALID_FIELD",
            Self::EmptyField { .. } => "MANIFEST_EMPTY_FIELD",
            Self::DuplicateId { .. } => "MANIFEST_DUPLICATE_ID",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportiq_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(
            &[
                ManifestError::NotAnObject,
                ManifestError::MissingField {
                    field: "layers".into(),
                },
                ManifestError::InvalidField {
                    field: "layers.active".into(),
                    expected: "an array",
                },
                ManifestError::EmptyField {
                    field: "id",
                    list: "active",
                    index: 0,
                },
                ManifestError::DuplicateId { id: "seo".into() },
            ],
            "MANIFEST_",
        );
    }

    #[test]
    fn duplicate_message_mentions_duplicate() {
        let err = ManifestError::DuplicateId { id: "polls".into() };
        assert!(err.to_string().contains("duplicate"));
        assert!(err.to_string().contains("polls"));
    }
}
