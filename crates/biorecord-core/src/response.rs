//! The mapped-response bag: whatever an API response mapping produced for one edge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::provenance::ProvenanceChainItem;

/// A (possibly nested) TRAPI-style edge attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_source: Option<String>,
    pub attribute_type_id: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<EdgeAttribute>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeAttribute {
    pub fn new(attribute_type_id: impl Into<String>, value: Value) -> Self {
        Self {
            attribute_type_id: attribute_type_id.into(),
            value,
            ..Self::default()
        }
    }

    pub fn with_sub_attributes(mut self, attributes: Vec<EdgeAttribute>) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

/// Depth-first pre-order walk over an attribute forest, every node included.
pub fn flatten_edge_attributes(attributes: &[EdgeAttribute]) -> Vec<&EdgeAttribute> {
    let mut out = Vec::new();
    let mut stack: Vec<&EdgeAttribute> = attributes.iter().rev().collect();
    while let Some(attribute) = stack.pop() {
        out.push(attribute);
        if let Some(children) = &attribute.attributes {
            stack.extend(children.iter().rev());
        }
    }
    out
}

/// Text form of an attribute value as it appears in hash content.
///
/// Strings are used verbatim and arrays are comma-joined element-wise; other
/// values use their JSON text.
pub fn attribute_value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(attribute_value_text)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<String>>,
    /// Explicit provenance chain; overrides the derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapi_sources: Option<Vec<ProvenanceChainItem>>,
    #[serde(rename = "edge-attributes", default, skip_serializing_if = "Option::is_none")]
    pub edge_attributes: Option<Vec<EdgeAttribute>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MappedResponse {
    pub fn flattened_edge_attributes(&self) -> Vec<&EdgeAttribute> {
        self.edge_attributes
            .as_deref()
            .map(flatten_edge_attributes)
            .unwrap_or_default()
    }
}
