//! Records: one directed knowledge-graph edge plus its supporting metadata.
//!
//! A [`Record`] is built from a [`FrozenRecord`] (any of the three tiers, or a
//! raw API-shaped record) and can be frozen back into any tier:
//!
//! | tier | method | Association | reload |
//! |---|---|---|---|
//! | full | [`Record::freeze_verbose`] | embedded | lossless |
//! | compact | [`Record::freeze`] | dropped, rebuilt from flat fields | same identity |
//! | minimal | [`Record::freeze_minimal`] | supplied by the caller | lossless with it |
//!
//! `recordHash` is computed from content only, so a record survives any of these
//! round-trips with the same hash.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::association::{reverse_qualifiers, Association, Qualifiers};
use crate::biolink::with_prefix;
use crate::config::RecordConfig;
use crate::digest::digest_hex;
use crate::error::{RecordError, Result};
use crate::node::{NodeParts, NodeShape, NormalizedInfo, RecordNode};
use crate::provenance::{derive_chain, ChainSources, ProvenanceChainItem};
use crate::query::{EdgeSide, QueryEdge, SyntheticQueryEdge};
use crate::response::{attribute_value_text, MappedResponse};

/// Wire form of a record at any tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrozenRecord {
    pub subject: NodeShape,
    pub object: NodeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<Association>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<Qualifiers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_infores_curie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_edge_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_response: Option<MappedResponse>,
}

impl FrozenRecord {
    /// Parse a record of any tier from JSON, reporting shape problems per field.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = &value else {
            return Err(RecordError::MalformedRecord(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        };
        for role in ["subject", "object"] {
            match map.get(role) {
                None | Some(Value::Null) => {
                    return Err(RecordError::MalformedRecord(format!("missing `{role}`")));
                }
                Some(node) => validate_node(role, node)?,
            }
        }
        serde_json::from_value(value).map_err(|e| RecordError::MalformedRecord(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }
}

/// Check one endpoint before the untagged `NodeShape` match can hide the cause.
///
/// A supplied `normalizedInfo` must parse on its own, never fall back to the
/// compact shape.
fn validate_node(role: &'static str, node: &Value) -> Result<()> {
    let malformed = |message: String| RecordError::MalformedNode { role, message };

    let Value::Object(fields) = node else {
        return Err(malformed(format!("expected a JSON object, got {}", json_kind(node))));
    };
    if let Some(info) = fields.get("normalizedInfo").filter(|info| !info.is_null()) {
        serde_json::from_value::<NormalizedInfo>(info.clone())
            .map_err(|e| malformed(format!("invalid `normalizedInfo`: {e}")))?;
    }
    if !fields.get("original").is_some_and(Value::is_string) {
        return Err(malformed("missing `original`".to_string()));
    }
    let has = |key: &str| fields.get(key).is_some_and(|v| !v.is_null());
    if !has("normalizedInfo") && !has("curie") {
        return Err(malformed("needs `normalizedInfo` or `curie`".to_string()));
    }

    serde_json::from_value::<NodeShape>(node.clone())
        .map(drop)
        .map_err(|e| malformed(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Optional collaborators for building a [`Record`].
#[derive(Debug)]
pub struct RecordBuilder {
    frozen: FrozenRecord,
    config: Option<Arc<RecordConfig>>,
    association: Option<Association>,
    query_edge: Option<Arc<dyn QueryEdge>>,
    reversed: bool,
}

impl RecordBuilder {
    pub fn config(mut self, config: impl Into<Arc<RecordConfig>>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Use this association instead of the record's embedded or flat fields.
    pub fn association(mut self, association: Association) -> Self {
        self.association = Some(association);
        self
    }

    pub fn query_edge(mut self, query_edge: Arc<dyn QueryEdge>) -> Self {
        self.query_edge = Some(query_edge);
        self
    }

    /// Build the execution-reversed view: subject binds to the output node.
    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn build(self) -> Result<Record> {
        let RecordBuilder {
            frozen,
            config,
            association,
            query_edge,
            reversed,
        } = self;

        let association = match association.or_else(|| frozen.association.clone()) {
            Some(association) => association,
            None => {
                let predicate = frozen
                    .predicate
                    .as_deref()
                    .ok_or(RecordError::MissingPredicate)?;
                debug!(predicate, "synthesizing association from record fields");
                Association::from_record_fields(
                    predicate,
                    frozen.qualifiers.as_ref(),
                    frozen.api.as_deref(),
                    frozen.meta_edge_source.as_deref(),
                    frozen.api_infores_curie.as_deref(),
                )
            }
        };

        let query_edge = match query_edge {
            Some(edge) => edge,
            None => {
                let edge: Arc<dyn QueryEdge> = Arc::new(SyntheticQueryEdge::for_record(&frozen));
                debug!(
                    hashed = %edge.hashed_edge_representation(),
                    "synthesizing query edge for record"
                );
                edge
            }
        };

        let FrozenRecord {
            subject,
            object,
            qualifiers,
            publications,
            mapped_response,
            ..
        } = frozen;

        let mut mapped_response = mapped_response.unwrap_or_default();
        if mapped_response.publications.is_none() {
            mapped_response.publications = publications;
        }

        Ok(Record::from_parts(RecordParts {
            association,
            query_edge,
            config: config.unwrap_or_default(),
            subject: subject.into(),
            object: object.into(),
            qualifiers,
            mapped_response,
            reverse_to_execution: reversed,
        }))
    }
}

struct RecordParts {
    association: Association,
    query_edge: Arc<dyn QueryEdge>,
    config: Arc<RecordConfig>,
    subject: NodeParts,
    object: NodeParts,
    qualifiers: Option<Qualifiers>,
    mapped_response: MappedResponse,
    reverse_to_execution: bool,
}

#[derive(Debug, Clone)]
pub struct Record {
    association: Association,
    query_edge: Arc<dyn QueryEdge>,
    config: Arc<RecordConfig>,
    subject: RecordNode,
    object: RecordNode,
    reverse_to_execution: bool,
    qualifiers: Option<Qualifiers>,
    mapped_response: MappedResponse,
}

impl Record {
    pub fn builder(frozen: FrozenRecord) -> RecordBuilder {
        RecordBuilder {
            frozen,
            config: None,
            association: None,
            query_edge: None,
            reversed: false,
        }
    }

    /// Build with default config and synthesized collaborators.
    pub fn new(frozen: FrozenRecord) -> Result<Self> {
        Self::builder(frozen).build()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Self::new(FrozenRecord::from_value(value)?)
    }

    fn from_parts(parts: RecordParts) -> Self {
        let (subject_side, object_side) = if parts.reverse_to_execution {
            (EdgeSide::Output, EdgeSide::Input)
        } else {
            (EdgeSide::Input, EdgeSide::Output)
        };
        Self {
            subject: RecordNode::from_parts(parts.subject, Arc::clone(&parts.query_edge), subject_side),
            object: RecordNode::from_parts(parts.object, Arc::clone(&parts.query_edge), object_side),
            association: parts.association,
            query_edge: parts.query_edge,
            config: parts.config,
            reverse_to_execution: parts.reverse_to_execution,
            qualifiers: parts.qualifiers,
            mapped_response: parts.mapped_response,
        }
    }

    pub fn subject(&self) -> &RecordNode {
        &self.subject
    }

    pub fn object(&self) -> &RecordNode {
        &self.object
    }

    pub fn association(&self) -> &Association {
        &self.association
    }

    pub fn query_edge(&self) -> &Arc<dyn QueryEdge> {
        &self.query_edge
    }

    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    pub fn mapped_response(&self) -> &MappedResponse {
        &self.mapped_response
    }

    /// Whether this instance is the execution-reversed view of its edge.
    pub fn reverse_to_execution(&self) -> bool {
        self.reverse_to_execution
    }

    /// `biolink:`-prefixed predicate.
    pub fn predicate(&self) -> String {
        self.association.prefixed_predicate()
    }

    /// Effective qualifiers, types (and predicate values) `biolink:`-prefixed.
    pub fn qualifiers(&self) -> Qualifiers {
        let Some(raw) = self.qualifiers.as_ref().or(self.association.qualifiers.as_ref()) else {
            return Qualifiers::new();
        };
        raw.iter()
            .map(|(qualifier_type, value)| {
                let value = if qualifier_type.contains("predicate") {
                    with_prefix(value)
                } else {
                    value.clone()
                };
                (with_prefix(qualifier_type), value)
            })
            .collect()
    }

    pub fn api(&self) -> Option<&str> {
        self.association.api_name.as_deref()
    }

    pub fn api_infores_curie(&self) -> Option<&str> {
        self.association.infores()
    }

    pub fn meta_edge_source(&self) -> Option<&str> {
        self.association.source.as_deref()
    }

    pub fn publications(&self) -> &[String] {
        self.mapped_response.publications.as_deref().unwrap_or_default()
    }

    pub fn provenance_chain(&self) -> Vec<ProvenanceChainItem> {
        derive_chain(ChainSources {
            api_infores: self.api_infores_curie(),
            meta_edge_source: self.meta_edge_source(),
            api_is_primary_knowledge_source: self.association.api_is_primary_knowledge_source,
            explicit: self.mapped_response.trapi_sources.as_deref(),
            final_aggregator: self.config.final_aggregator(),
        })
    }

    /// Digest of the association, the key records are grouped by when packed.
    pub fn association_digest(&self) -> Result<String> {
        self.association.digest()
    }

    /// `type_id:value` for every allow-listed attribute, comma-joined.
    fn hashed_edge_attributes(&self) -> String {
        self.mapped_response
            .flattened_edge_attributes()
            .into_iter()
            .filter(|attribute| self.config.hashes_attribute(&attribute.attribute_type_id))
            .map(|attribute| {
                format!(
                    "{}:{}",
                    attribute.attribute_type_id,
                    attribute_value_text(&attribute.value)
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn record_hash_content(&self) -> String {
        let qualifiers = self
            .qualifiers()
            .iter()
            .map(|(qualifier_type, value)| format!(";{qualifier_type}:{value}"))
            .collect::<String>();
        let predicate = self.predicate();
        let attributes = self.hashed_edge_attributes();
        [
            self.subject.curie(),
            predicate.as_str(),
            self.object.curie(),
            qualifiers.as_str(),
            self.api().unwrap_or_default(),
            self.meta_edge_source().unwrap_or_default(),
            attributes.as_str(),
        ]
        .join("-")
    }

    /// Content identity of this record.
    pub fn record_hash(&self) -> String {
        let content = self.record_hash_content();
        trace!(%content, "record hash content");
        digest_hex(&content)
    }

    /// The same assertion traversed object -> subject.
    pub fn reverse(&self) -> Record {
        let edge = self.query_edge.as_ref();
        Record::from_parts(RecordParts {
            association: self.association.reversed(edge),
            query_edge: Arc::clone(&self.query_edge),
            config: Arc::clone(&self.config),
            subject: self.object.to_parts(),
            object: self.subject.to_parts(),
            qualifiers: self.qualifiers.as_ref().map(|q| reverse_qualifiers(q, edge)),
            mapped_response: self.mapped_response.clone(),
            reverse_to_execution: !self.reverse_to_execution,
        })
    }

    /// This record oriented like the original query's subject -> object.
    pub fn query_direction(self) -> Record {
        if self.query_edge.is_reversed() {
            self.reverse()
        } else {
            self
        }
    }

    /// Full tier.
    pub fn freeze_verbose(&self) -> FrozenRecord {
        FrozenRecord {
            subject: NodeShape::Verbose(self.subject.freeze_verbose()),
            object: NodeShape::Verbose(self.object.freeze_verbose()),
            association: Some(self.association.clone()),
            predicate: Some(self.predicate()),
            qualifiers: Some(self.qualifiers()),
            publications: Some(self.publications().to_vec()),
            record_hash: Some(self.record_hash()),
            api: self.api().map(str::to_string),
            api_infores_curie: self.api_infores_curie().map(str::to_string),
            meta_edge_source: self.meta_edge_source().map(str::to_string),
            mapped_response: Some(self.mapped_response.clone()),
        }
    }

    /// Compact tier; publications travel only in the top-level field.
    pub fn freeze(&self) -> FrozenRecord {
        let mut mapped_response = self.mapped_response.clone();
        mapped_response.publications = None;
        FrozenRecord {
            subject: NodeShape::Compact(self.subject.freeze()),
            object: NodeShape::Compact(self.object.freeze()),
            association: None,
            mapped_response: Some(mapped_response),
            ..self.freeze_verbose()
        }
    }

    /// Minimal tier; reload needs the association (and query edge) supplied.
    pub fn freeze_minimal(&self) -> FrozenRecord {
        FrozenRecord {
            subject: NodeShape::Minimal(self.subject.freeze_minimal()),
            object: NodeShape::Minimal(self.object.freeze_minimal()),
            association: None,
            predicate: None,
            qualifiers: Some(self.qualifiers()),
            publications: Some(self.publications().to_vec()),
            record_hash: None,
            api: None,
            api_infores_curie: None,
            meta_edge_source: None,
            mapped_response: Some(self.mapped_response.clone()),
        }
    }
}
