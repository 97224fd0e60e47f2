//! Typed manifest document and the validated, indexed view of it.

use serde::{Deserialize, Serialize};
use sportiq_layer::LayerDescriptor;
use sportiq_types::LayerId;
use std::collections::HashMap;

/// The manifest document as declared on disk.
///
/// # Shape
///
/// ```json
/// {
///   "manifest_version": "1.0",
///   "total_layers": 3,
///   "layers": {
///     "active": [ { "id": "...", "name": "...", "entry": "..." } ],
///     "now_activating": []
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestDoc {
    /// Manifest format version string.
    pub manifest_version: String,

    /// Declared layer count; advisory only, a mismatch logs a warning.
    #[serde(default)]
    pub total_layers: Option<u64>,

    /// The layer lists.
    pub layers: LayerLists,
}

/// The `layers` section of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerLists {
    /// Layers that participate in activation.
    pub active: Vec<LayerDescriptor>,

    /// Staged layers: validated like `active`, never activated.
    #[serde(default)]
    pub now_activating: Vec<LayerDescriptor>,
}

/// A validated manifest with an id index for O(1) lookup.
///
/// Built by the loader after structural validation succeeds; the index
/// covers the `active` list only, matching what activation consumes.
#[derive(Debug)]
pub struct ValidatedManifest {
    doc: ManifestDoc,
    index: HashMap<LayerId, usize>,
}

impl ValidatedManifest {
    pub(crate) fn new(doc: ManifestDoc) -> Self {
        let index = doc
            .layers
            .active
            .iter()
            .enumerate()
            .map(|(i, desc)| (desc.id.clone(), i))
            .collect();

        if let Some(declared) = doc.total_layers {
            let actual = (doc.layers.active.len() + doc.layers.now_activating.len()) as u64;
            if declared != actual {
                tracing::warn!(declared, actual, "manifest total_layers does not match");
            }
        }

        Self { doc, index }
    }

    /// Manifest format version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.doc.manifest_version
    }

    /// Looks up an active layer by id.
    #[must_use]
    pub fn layer(&self, id: &LayerId) -> Option<&LayerDescriptor> {
        self.index.get(id).map(|&i| &self.doc.layers.active[i])
    }

    /// All active layers, in declaration order.
    #[must_use]
    pub fn all_layers(&self) -> &[LayerDescriptor] {
        &self.doc.layers.active
    }

    /// Staged layers awaiting promotion to `active`.
    #[must_use]
    pub fn now_activating(&self) -> &[LayerDescriptor] {
        &self.doc.layers.now_activating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> ManifestDoc {
        ManifestDoc {
            manifest_version: "1.0".into(),
            total_layers: None,
            layers: LayerLists {
                active: vec![
                    LayerDescriptor::new("live-ticker", "Live Ticker", "ticker"),
                    LayerDescriptor::new("seo-meta", "SEO Meta", "seo"),
                ],
                now_activating: vec![LayerDescriptor::new("polls", "Polls", "polls")],
            },
        }
    }

    #[test]
    fn index_lookup() {
        let manifest = ValidatedManifest::new(doc());
        let found = manifest.layer(&LayerId::new("seo-meta")).unwrap();
        assert_eq!(found.name, "SEO Meta");
        assert!(manifest.layer(&LayerId::new("ghost")).is_none());
    }

    #[test]
    fn staged_layers_excluded_from_active() {
        let manifest = ValidatedManifest::new(doc());
        assert_eq!(manifest.all_layers().len(), 2);
        assert_eq!(manifest.now_activating().len(), 1);
        assert!(manifest.layer(&LayerId::new("polls")).is_none());
    }
}
