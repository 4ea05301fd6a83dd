//! The layout tree model and its transforms.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: the serde-mapped [`LayoutModel`] tree, the tab counter,
//! and the free-tier limiter.  Outer layers (license validation, gating,
//! host glue) depend on this module; it depends on nothing but serde.

pub mod count;
pub mod error;
pub mod limit;
pub mod node;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use error::ModelError;
use node::{BorderRegion, LayoutNode};

/// The root aggregate of a docking layout.
///
/// Mirrors the JSON document the rendering widget consumes: an optional
/// list of border regions pinned to the window edges, an optional main
/// layout tree, and any number of global attributes (fonts, splitter
/// sizes, popout settings, ...) that this crate does not interpret but
/// must preserve round-trip.
///
/// The model is owned by the caller and passed by reference into the
/// transforms, which never mutate it — they return new trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LayoutModel {
    /// Border regions in declaration order.  Absent in the JSON is the
    /// same as empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub borders: Vec<BorderRegion>,

    /// The main layout tree, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutNode>,

    /// Global attributes passed through untouched (e.g. `global`,
    /// `attributes` blocks the renderer understands).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LayoutModel {
    /// Parses a model from an in-memory JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Malformed`] if the value is not a layout
    /// model object.  Unrecognized *node types* inside an otherwise valid
    /// model do not fail — they become [`LayoutNode::Unknown`].
    pub fn from_json(value: &Value) -> Result<Self, ModelError> {
        serde_json::from_value(value.clone()).map_err(ModelError::Malformed)
    }

    /// Parses a model from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Malformed`] on invalid JSON or a non-object
    /// document.
    pub fn from_str(text: &str) -> Result<Self, ModelError> {
        serde_json::from_str(text).map_err(ModelError::Malformed)
    }

    /// Serializes the model back to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Malformed`] only if a preserved extra value
    /// cannot be re-serialized, which cannot happen for trees that came
    /// from [`LayoutModel::from_json`].
    pub fn to_json(&self) -> Result<Value, ModelError> {
        serde_json::to_value(self).map_err(ModelError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_parses_to_default_model() {
        let model = LayoutModel::from_json(&json!({})).unwrap();
        assert!(model.borders.is_empty());
        assert!(model.layout.is_none());
    }

    #[test]
    fn test_global_attributes_survive_round_trip() {
        // Arrange: a model with a `global` block this crate does not model.
        let doc = json!({
            "global": { "tabEnableClose": false },
            "layout": { "type": "tabset", "weight": 100, "children": [] }
        });

        // Act
        let model = LayoutModel::from_json(&doc).unwrap();
        let back = model.to_json().unwrap();

        // Assert: the block is preserved verbatim.
        assert_eq!(back["global"], doc["global"]);
    }

    #[test]
    fn test_non_object_document_is_malformed() {
        let err = LayoutModel::from_json(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn test_invalid_json_text_is_malformed() {
        let err = LayoutModel::from_str("{not json").unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }
}
