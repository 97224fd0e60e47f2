//! Structural manifest validation.
//!
//! Runs against the raw JSON value before typed deserialization so every
//! failure can name the exact field, list, and index at fault.

use crate::ManifestError;
use serde_json::Value;
use std::collections::HashSet;

/// Validates the raw manifest JSON.
///
/// Checks, in order:
///
/// 1. Root is an object with a string `manifest_version`.
/// 2. `layers` is an object with an `active` array; `now_activating`, when
///    present, is an array too.
/// 3. Every entry in both lists has non-empty string `id`, `name`, `entry`.
/// 4. `dependencies`, when present, is an array of strings.
/// 5. No layer id appears twice across both lists.
///
/// # Errors
///
/// Returns the first [`ManifestError`] encountered.
pub fn validate(value: &Value) -> Result<(), ManifestError> {
    let root = value.as_object().ok_or(ManifestError::NotAnObject)?;

    let version = root
        .get("manifest_version")
        .ok_or_else(|| ManifestError::MissingField {
            field: "manifest_version".into(),
        })?;
    if !version.is_string() {
        return Err(ManifestError::InvalidField {
            field: "manifest_version".into(),
            expected: "a string",
        });
    }

    let layers = root
        .get("layers")
        .ok_or_else(|| ManifestError::MissingField {
            field: "layers".into(),
        })?
        .as_object()
        .ok_or(ManifestError::InvalidField {
            field: "layers".into(),
            expected: "an object",
        })?;

    let active = layers
        .get("active")
        .ok_or_else(|| ManifestError::MissingField {
            field: "layers.active".into(),
        })?
        .as_array()
        .ok_or(ManifestError::InvalidField {
            field: "layers.active".into(),
            expected: "an array",
        })?;

    let mut seen = HashSet::new();
    validate_entries(active, "active", &mut seen)?;

    if let Some(staged) = layers.get("now_activating") {
        let staged = staged.as_array().ok_or(ManifestError::InvalidField {
            field: "layers.now_activating".into(),
            expected: "an array",
        })?;
        validate_entries(staged, "now_activating", &mut seen)?;
    }

    Ok(())
}

fn validate_entries(
    entries: &[Value],
    list: &'static str,
    seen: &mut HashSet<String>,
) -> Result<(), ManifestError> {
    for (index, entry) in entries.iter().enumerate() {
        let obj = entry.as_object().ok_or(ManifestError::InvalidField {
            field: format!("layers.{list}[{index}]"),
            expected: "an object",
        })?;

        for field in ["id", "name", "entry"] {
            let text = obj
                .get(field)
                .and_then(Value::as_str)
                .ok_or(ManifestError::EmptyField { field, list, index })?;
            if text.is_empty() {
                return Err(ManifestError::EmptyField { field, list, index });
            }
        }

        if let Some(deps) = obj.get("dependencies") {
            let deps = deps.as_array().ok_or(ManifestError::InvalidField {
                field: format!("layers.{list}[{index}].dependencies"),
                expected: "an array of strings",
            })?;
            if deps.iter().any(|d| !d.is_string()) {
                return Err(ManifestError::InvalidField {
                    field: format!("layers.{list}[{index}].dependencies"),
                    expected: "an array of strings",
                });
            }
        }

        // id validated as non-empty above
        let id = obj["id"].as_str().unwrap_or_default().to_string();
        if !seen.insert(id.clone()) {
            return Err(ManifestError::DuplicateId { id });
        }
    }
    Ok(())
}
