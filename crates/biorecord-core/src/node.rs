//! Record endpoints.
//!
//! A node arrives in one of three frozen shapes (or a raw API shape, which is
//! read like the compact one). All of them converge into [`NodeParts`]
//! (`original`, [`NormalizedInfo`], `apiLabel`); every other field of a frozen
//! node is a projection recomputed from those parts on read.
//!
//! | shape | carries | reload |
//! |---|---|---|
//! | verbose | everything | lossless |
//! | compact | canonical id, label, UMLS, types | equivalence breadth is lost |
//! | minimal | `original`, `normalizedInfo`, `apiLabel` | lossless |

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::biolink::{strip_prefix, with_prefix};
use crate::query::{EdgeSide, QueryEdge};

pub type NodeAttributes = Map<String, Value>;

const UMLS_PREFIX: &str = "UMLS:";

/// Identifier-normalization result for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInfo {
    #[serde(rename = "primaryID")]
    pub primary_id: String,
    #[serde(rename = "equivalentIDs", default)]
    pub equivalent_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub label_aliases: Vec<String>,
    #[serde(default)]
    pub primary_types: Vec<String>,
    #[serde(default)]
    pub semantic_types: Vec<String>,
    #[serde(default)]
    pub attributes: NodeAttributes,
}

/// Accept `"x"`, `["x", "y"]` or `null` wherever a list of strings is expected.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

/// Full node form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerboseFrozenNode {
    pub original: String,
    #[serde(rename = "normalizedInfo")]
    pub normalized_info: NormalizedInfo,
    #[serde(rename = "qNodeID", default, skip_serializing_if = "Option::is_none")]
    pub q_node_id: Option<String>,
    #[serde(rename = "isSet", default)]
    pub is_set: bool,
    pub curie: String,
    #[serde(rename = "UMLS", default, deserialize_with = "one_or_many")]
    pub umls: Vec<String>,
    #[serde(rename = "semanticType", default, deserialize_with = "one_or_many")]
    pub semantic_type: Vec<String>,
    #[serde(rename = "semanticTypes", default, deserialize_with = "one_or_many")]
    pub semantic_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "apiLabel", default, skip_serializing_if = "Option::is_none")]
    pub api_label: Option<String>,
    #[serde(rename = "equivalentCuries", default, deserialize_with = "one_or_many")]
    pub equivalent_curies: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub names: Vec<String>,
    #[serde(default)]
    pub attributes: NodeAttributes,
}

/// Compact node form; also the shape raw API nodes arrive in.
///
/// `equivalentCuries` and `names` are never written by [`RecordNode::freeze`],
/// but raw input may carry them and they feed the synthesized info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrozenNode {
    pub original: String,
    #[serde(rename = "qNodeID", default, skip_serializing_if = "Option::is_none")]
    pub q_node_id: Option<String>,
    #[serde(rename = "isSet", default)]
    pub is_set: bool,
    pub curie: String,
    #[serde(rename = "UMLS", default, deserialize_with = "one_or_many")]
    pub umls: Vec<String>,
    #[serde(rename = "semanticType", default, deserialize_with = "one_or_many")]
    pub semantic_type: Vec<String>,
    #[serde(rename = "semanticTypes", default, deserialize_with = "one_or_many")]
    pub semantic_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "apiLabel", default, skip_serializing_if = "Option::is_none")]
    pub api_label: Option<String>,
    #[serde(
        rename = "equivalentCuries",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub equivalent_curies: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default)]
    pub attributes: NodeAttributes,
}

/// Minimal node form used inside record packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalFrozenNode {
    pub original: String,
    #[serde(rename = "normalizedInfo")]
    pub normalized_info: NormalizedInfo,
    #[serde(rename = "apiLabel", default, skip_serializing_if = "Option::is_none")]
    pub api_label: Option<String>,
}

/// Any accepted node shape, told apart by which fields are present.
///
/// Variant order matters for deserialization: a node with both
/// `normalizedInfo` and `curie` is verbose, one with only `normalizedInfo` is
/// minimal, one with only `curie` is compact/raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeShape {
    Verbose(VerboseFrozenNode),
    Minimal(MinimalFrozenNode),
    Compact(FrozenNode),
}

impl NodeShape {
    pub fn original(&self) -> &str {
        match self {
            NodeShape::Verbose(n) => &n.original,
            NodeShape::Minimal(n) => &n.original,
            NodeShape::Compact(n) => &n.original,
        }
    }

    pub fn q_node_id(&self) -> Option<&str> {
        match self {
            NodeShape::Verbose(n) => n.q_node_id.as_deref(),
            NodeShape::Minimal(_) => None,
            NodeShape::Compact(n) => n.q_node_id.as_deref(),
        }
    }

    pub fn is_set(&self) -> bool {
        match self {
            NodeShape::Verbose(n) => n.is_set,
            NodeShape::Minimal(_) => false,
            NodeShape::Compact(n) => n.is_set,
        }
    }

    pub fn semantic_type(&self) -> &[String] {
        match self {
            NodeShape::Verbose(n) => &n.semantic_type,
            NodeShape::Minimal(_) => &[],
            NodeShape::Compact(n) => &n.semantic_type,
        }
    }

    /// Equivalent curies if this shape carries them at all.
    pub fn equivalent_curies(&self) -> Option<&[String]> {
        match self {
            NodeShape::Verbose(n) => Some(&n.equivalent_curies),
            NodeShape::Minimal(_) => None,
            NodeShape::Compact(n) if n.equivalent_curies.is_empty() => None,
            NodeShape::Compact(n) => Some(&n.equivalent_curies),
        }
    }
}

/// The stored state of a node; everything else is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeParts {
    pub original: String,
    pub normalized_info: NormalizedInfo,
    pub api_label: Option<String>,
}

impl From<NodeShape> for NodeParts {
    fn from(shape: NodeShape) -> Self {
        match shape {
            NodeShape::Verbose(n) => NodeParts {
                original: n.original,
                normalized_info: n.normalized_info,
                api_label: n.api_label,
            },
            NodeShape::Minimal(n) => NodeParts {
                original: n.original,
                normalized_info: n.normalized_info,
                api_label: n.api_label,
            },
            NodeShape::Compact(n) => {
                let normalized_info = synthesize_info(&n);
                NodeParts {
                    original: n.original,
                    normalized_info,
                    api_label: n.api_label,
                }
            }
        }
    }
}

/// Stand-in normalization result for nodes that were never normalized or were
/// frozen compactly.
fn synthesize_info(node: &FrozenNode) -> NormalizedInfo {
    let mut equivalent_ids = node.equivalent_curies.clone();
    for id in &node.umls {
        let curie = if id.starts_with(UMLS_PREFIX) {
            id.clone()
        } else {
            format!("{UMLS_PREFIX}{id}")
        };
        if !equivalent_ids.contains(&curie) {
            equivalent_ids.push(curie);
        }
    }

    NormalizedInfo {
        primary_id: node.curie.clone(),
        equivalent_ids,
        label: node.label.clone(),
        label_aliases: node.names.clone(),
        primary_types: unprefixed(&node.semantic_type),
        semantic_types: unprefixed(&node.semantic_types),
        attributes: node.attributes.clone(),
    }
}

fn unprefixed(types: &[String]) -> Vec<String> {
    types.iter().map(|t| strip_prefix(t).to_string()).collect()
}

/// One endpoint of a record, bound to one side of a query edge.
#[derive(Debug, Clone)]
pub struct RecordNode {
    original: String,
    normalized_info: NormalizedInfo,
    api_label: Option<String>,
    query_edge: Arc<dyn QueryEdge>,
    side: EdgeSide,
}

impl RecordNode {
    pub fn new(shape: NodeShape, query_edge: Arc<dyn QueryEdge>, side: EdgeSide) -> Self {
        Self::from_parts(shape.into(), query_edge, side)
    }

    pub(crate) fn from_parts(parts: NodeParts, query_edge: Arc<dyn QueryEdge>, side: EdgeSide) -> Self {
        Self {
            original: parts.original,
            normalized_info: parts.normalized_info,
            api_label: parts.api_label,
            query_edge,
            side,
        }
    }

    pub(crate) fn to_parts(&self) -> NodeParts {
        NodeParts {
            original: self.original.clone(),
            normalized_info: self.normalized_info.clone(),
            api_label: self.api_label.clone(),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn normalized_info(&self) -> &NormalizedInfo {
        &self.normalized_info
    }

    pub fn api_label(&self) -> Option<&str> {
        self.api_label.as_deref()
    }

    pub fn side(&self) -> EdgeSide {
        self.side
    }

    pub fn q_node_id(&self) -> Option<&str> {
        self.query_edge.node(self.side).id()
    }

    pub fn is_set(&self) -> bool {
        self.query_edge.node(self.side).is_set()
    }

    /// Canonical id.
    pub fn curie(&self) -> &str {
        &self.normalized_info.primary_id
    }

    /// UMLS ids (without the `UMLS:` prefix) among the equivalent ids.
    pub fn umls(&self) -> Vec<String> {
        self.normalized_info
            .equivalent_ids
            .iter()
            .filter(|id| id.contains("UMLS"))
            .map(|id| id.replacen(UMLS_PREFIX, "", 1))
            .collect()
    }

    pub fn semantic_type(&self) -> Vec<String> {
        self.normalized_info
            .primary_types
            .iter()
            .map(|t| with_prefix(t))
            .collect()
    }

    pub fn semantic_types(&self) -> Vec<String> {
        self.normalized_info
            .semantic_types
            .iter()
            .map(|t| with_prefix(t))
            .collect()
    }

    /// Normalized label, unless normalization just echoed the id back.
    pub fn label(&self) -> Option<&str> {
        match self.normalized_info.label.as_deref() {
            Some(label) if label == self.curie() => self.api_label.as_deref(),
            Some(label) => Some(label),
            None => self.api_label.as_deref(),
        }
    }

    pub fn equivalent_curies(&self) -> &[String] {
        &self.normalized_info.equivalent_ids
    }

    pub fn names(&self) -> &[String] {
        &self.normalized_info.label_aliases
    }

    pub fn attributes(&self) -> &NodeAttributes {
        &self.normalized_info.attributes
    }

    pub fn freeze_verbose(&self) -> VerboseFrozenNode {
        VerboseFrozenNode {
            original: self.original.clone(),
            normalized_info: self.normalized_info.clone(),
            q_node_id: self.q_node_id().map(str::to_string),
            is_set: self.is_set(),
            curie: self.curie().to_string(),
            umls: self.umls(),
            semantic_type: self.semantic_type(),
            semantic_types: self.semantic_types(),
            label: self.label().map(str::to_string),
            api_label: self.api_label.clone(),
            equivalent_curies: self.equivalent_curies().to_vec(),
            names: self.names().to_vec(),
            attributes: self.attributes().clone(),
        }
    }

    pub fn freeze(&self) -> FrozenNode {
        FrozenNode {
            original: self.original.clone(),
            q_node_id: self.q_node_id().map(str::to_string),
            is_set: self.is_set(),
            curie: self.curie().to_string(),
            umls: self.umls(),
            semantic_type: self.semantic_type(),
            semantic_types: self.semantic_types(),
            label: self.label().map(str::to_string),
            api_label: self.api_label.clone(),
            equivalent_curies: Vec::new(),
            names: Vec::new(),
            attributes: self.attributes().clone(),
        }
    }

    pub fn freeze_minimal(&self) -> MinimalFrozenNode {
        MinimalFrozenNode {
            original: self.original.clone(),
            normalized_info: self.normalized_info.clone(),
            api_label: self.api_label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SyntheticQueryEdge, SyntheticQueryNode};
    use serde_json::json;

    fn edge() -> Arc<dyn QueryEdge> {
        Arc::new(SyntheticQueryEdge::new(
            SyntheticQueryNode::new(Some("n0".into()), false),
            SyntheticQueryNode::new(Some("n1".into()), true),
            String::new(),
        ))
    }

    fn normalized() -> NormalizedInfo {
        NormalizedInfo {
            primary_id: "NCBIGene:1017".into(),
            equivalent_ids: vec![
                "NCBIGene:1017".into(),
                "HGNC:1771".into(),
                "UMLS:C1332733".into(),
            ],
            label: Some("CDK2".into()),
            label_aliases: vec!["cyclin dependent kinase 2".into()],
            primary_types: vec!["Gene".into()],
            semantic_types: vec!["Gene".into(), "GeneOrGeneProduct".into()],
            attributes: Map::new(),
        }
    }

    fn minimal_node() -> RecordNode {
        let shape = NodeShape::Minimal(MinimalFrozenNode {
            original: "ENTREZ:1017".into(),
            normalized_info: normalized(),
            api_label: Some("cdk2".into()),
        });
        RecordNode::new(shape, edge(), EdgeSide::Input)
    }

    #[test]
    fn derived_views_project_normalized_info() {
        let node = minimal_node();
        assert_eq!(node.curie(), "NCBIGene:1017");
        assert_eq!(node.umls(), vec!["C1332733".to_string()]);
        assert_eq!(node.semantic_type(), vec!["biolink:Gene".to_string()]);
        assert_eq!(node.semantic_types().len(), 2);
        assert_eq!(node.label(), Some("CDK2"));
        assert_eq!(node.names().len(), 1);
    }

    #[test]
    fn query_binding_is_projected_from_the_edge() {
        let node = minimal_node();
        assert_eq!(node.q_node_id(), Some("n0"));
        assert!(!node.is_set());

        let other = RecordNode::from_parts(node.to_parts(), edge(), EdgeSide::Output);
        assert_eq!(other.q_node_id(), Some("n1"));
        assert!(other.is_set());
    }

    #[test]
    fn label_falls_back_when_normalizer_echoes_the_id() {
        let mut info = normalized();
        info.label = Some(info.primary_id.clone());
        let parts = NodeParts {
            original: "x".into(),
            normalized_info: info,
            api_label: Some("api label".into()),
        };
        let node = RecordNode::from_parts(parts, edge(), EdgeSide::Input);
        assert_eq!(node.label(), Some("api label"));
    }

    #[test]
    fn raw_node_with_scalar_fields_synthesizes_info() {
        let shape: NodeShape = serde_json::from_value(json!({
            "original": "originalThing0",
            "qNodeID": "n0",
            "isSet": false,
            "curie": "prefix:1",
            "UMLS": "UMLSstring0",
            "semanticType": "gene",
            "label": "someLabel0",
            "names": ["someName0"],
            "attributes": {}
        }))
        .unwrap();
        assert!(matches!(shape, NodeShape::Compact(_)));
        assert_eq!(shape.q_node_id(), Some("n0"));

        let node = RecordNode::new(shape, edge(), EdgeSide::Input);
        assert_eq!(node.curie(), "prefix:1");
        assert_eq!(node.umls(), vec!["UMLSstring0".to_string()]);
        assert_eq!(node.semantic_type(), vec!["biolink:gene".to_string()]);
        assert_eq!(node.names(), ["someName0".to_string()]);
        assert_eq!(node.label(), Some("someLabel0"));
    }

    #[test]
    fn shapes_are_told_apart_by_fields() {
        let node = minimal_node();
        let verbose = serde_json::to_value(node.freeze_verbose()).unwrap();
        let compact = serde_json::to_value(node.freeze()).unwrap();
        let minimal = serde_json::to_value(node.freeze_minimal()).unwrap();

        assert!(matches!(
            serde_json::from_value::<NodeShape>(verbose).unwrap(),
            NodeShape::Verbose(_)
        ));
        assert!(matches!(
            serde_json::from_value::<NodeShape>(compact.clone()).unwrap(),
            NodeShape::Compact(_)
        ));
        assert!(matches!(
            serde_json::from_value::<NodeShape>(minimal).unwrap(),
            NodeShape::Minimal(_)
        ));

        assert!(compact.get("normalizedInfo").is_none());
        assert!(compact.get("equivalentCuries").is_none());
        assert!(compact.get("names").is_none());
    }

    #[test]
    fn compact_reload_keeps_identity_but_loses_breadth() {
        let node = minimal_node();
        let reloaded = RecordNode::new(NodeShape::Compact(node.freeze()), edge(), EdgeSide::Input);

        assert_eq!(reloaded.curie(), node.curie());
        assert_eq!(reloaded.label(), node.label());
        assert_eq!(reloaded.umls(), node.umls());
        assert_eq!(reloaded.semantic_type(), node.semantic_type());
        assert_eq!(reloaded.semantic_types(), node.semantic_types());
        assert!(reloaded.names().is_empty());
        assert!(!reloaded.equivalent_curies().contains(&"HGNC:1771".to_string()));
    }

    #[test]
    fn verbose_and_minimal_reload_are_lossless() {
        let node = minimal_node();
        for shape in [
            NodeShape::Verbose(node.freeze_verbose()),
            NodeShape::Minimal(node.freeze_minimal()),
        ] {
            let reloaded = RecordNode::new(shape, edge(), EdgeSide::Input);
            assert_eq!(reloaded.to_parts(), node.to_parts());
        }
    }

    #[test]
    fn node_without_curie_or_info_is_rejected() {
        let result = serde_json::from_value::<NodeShape>(json!({ "original": "x" }));
        assert!(result.is_err());
    }
}
