//! Direction-independent edge metadata shared by every record an API edge produces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::biolink::{strip_prefix, with_prefix};
use crate::digest::digest_hex;
use crate::error::Result;
use crate::query::QueryEdge;

/// Qualifier type -> qualifier value.
///
/// Ordered by type, so iteration is already the canonical order used for hashing.
pub type Qualifiers = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XTranslator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infores: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Source-API edge metadata (the "meta-edge" a record was produced from).
///
/// `predicate` and qualifier types are kept unprefixed; keys this crate does not
/// interpret are carried in `extra` and survive packing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Association {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    pub predicate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_name: Option<String>,
    #[serde(rename = "x-translator", default, skip_serializing_if = "Option::is_none")]
    pub x_translator: Option<XTranslator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<Qualifiers>,
    #[serde(rename = "apiIsPrimaryKnowledgeSource", default)]
    pub api_is_primary_knowledge_source: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Association {
    /// Build from the flat fields of a frozen record, dropping namespace prefixes.
    pub fn from_record_fields(
        predicate: &str,
        qualifiers: Option<&Qualifiers>,
        api_name: Option<&str>,
        source: Option<&str>,
        infores: Option<&str>,
    ) -> Self {
        Self {
            predicate: strip_prefix(predicate).to_string(),
            qualifiers: qualifiers.map(|q| {
                q.iter()
                    .map(|(qualifier_type, value)| {
                        (strip_prefix(qualifier_type).to_string(), value.clone())
                    })
                    .collect()
            }),
            api_name: api_name.map(str::to_string),
            source: source.map(str::to_string),
            x_translator: Some(XTranslator {
                infores: infores.map(str::to_string),
                extra: Map::new(),
            }),
            api_is_primary_knowledge_source: false,
            ..Self::default()
        }
    }

    /// `biolink:`-prefixed predicate.
    pub fn prefixed_predicate(&self) -> String {
        with_prefix(&self.predicate)
    }

    pub fn infores(&self) -> Option<&str> {
        self.x_translator
            .as_ref()
            .and_then(|x| x.infores.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Digest of the JSON form; equal associations share a digest.
    pub fn digest(&self) -> Result<String> {
        Ok(digest_hex(&serde_json::to_string(self)?))
    }

    /// The same metadata seen from the other end of the edge.
    pub fn reversed(&self, query_edge: &dyn QueryEdge) -> Self {
        Self {
            input_id: self.output_id.clone(),
            input_type: self.output_type.clone(),
            output_id: self.input_id.clone(),
            output_type: self.input_type.clone(),
            predicate: query_edge.reversed_predicate(strip_prefix(&self.predicate)),
            qualifiers: self
                .qualifiers
                .as_ref()
                .map(|q| reverse_qualifiers(q, query_edge)),
            ..self.clone()
        }
    }
}

/// Re-derive qualifiers for the opposite direction.
///
/// Predicate-valued qualifiers take the inverse predicate; `subject*` types
/// become `object*` and vice versa. Applying it twice restores the input as
/// long as the edge's predicate inversion is an involution.
pub fn reverse_qualifiers(qualifiers: &Qualifiers, query_edge: &dyn QueryEdge) -> Qualifiers {
    qualifiers
        .iter()
        .map(|(qualifier_type, value)| {
            let value = if qualifier_type.contains("predicate") {
                with_prefix(&query_edge.reversed_predicate(strip_prefix(value)))
            } else {
                value.clone()
            };
            let qualifier_type = if qualifier_type.contains("subject") {
                qualifier_type.replacen("subject", "object", 1)
            } else if qualifier_type.contains("object") {
                qualifier_type.replacen("object", "subject", 1)
            } else {
                qualifier_type.clone()
            };
            (qualifier_type, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SyntheticQueryEdge, SyntheticQueryNode};
    use serde_json::json;

    fn edge() -> SyntheticQueryEdge {
        SyntheticQueryEdge::new(
            SyntheticQueryNode::default(),
            SyntheticQueryNode::default(),
            String::new(),
        )
    }

    fn qualifiers() -> Qualifiers {
        Qualifiers::from([
            ("qualified_predicate".to_string(), "biolink:causes".to_string()),
            ("object_aspect_qualifier".to_string(), "activity".to_string()),
            ("subject_direction_qualifier".to_string(), "increased".to_string()),
        ])
    }

    #[test]
    fn record_fields_are_stripped_of_prefixes() {
        let q = Qualifiers::from([("biolink:object_aspect_qualifier".to_string(), "activity".to_string())]);
        let a = Association::from_record_fields(
            "biolink:affects",
            Some(&q),
            Some("someAPI"),
            Some("infores:src"),
            Some("infores:api"),
        );
        assert_eq!(a.predicate, "affects");
        assert_eq!(a.prefixed_predicate(), "biolink:affects");
        assert!(a.qualifiers.unwrap().contains_key("object_aspect_qualifier"));
        assert!(!a.api_is_primary_knowledge_source);
    }

    #[test]
    fn empty_infores_reads_as_absent() {
        let a = Association::from_record_fields("x", None, None, None, Some(""));
        assert_eq!(a.infores(), None);
    }

    #[test]
    fn reversal_swaps_ends_and_inverts_predicate() {
        let a = Association {
            input_id: Some("NCBIGene".into()),
            input_type: Some("Gene".into()),
            output_id: Some("MONDO".into()),
            output_type: Some("Disease".into()),
            predicate: "causes".into(),
            qualifiers: Some(qualifiers()),
            ..Association::default()
        };
        let r = a.reversed(&edge());
        assert_eq!(r.input_type.as_deref(), Some("Disease"));
        assert_eq!(r.output_id.as_deref(), Some("NCBIGene"));
        assert_eq!(r.predicate, "caused_by");

        let q = r.qualifiers.as_ref().unwrap();
        assert_eq!(q["qualified_predicate"], "biolink:caused_by");
        assert_eq!(q["subject_aspect_qualifier"], "activity");
        assert_eq!(q["object_direction_qualifier"], "increased");

        assert_eq!(r.reversed(&edge()), a);
    }

    #[test]
    fn unknown_keys_survive_a_json_round_trip() {
        let value = json!({
            "predicate": "treats",
            "api_name": "MyChem",
            "x-translator": { "infores": "infores:mychem-info", "component": "KP" },
            "response_mapping": { "treats": "drug.indication" }
        });
        let a: Association = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(a.infores(), Some("infores:mychem-info"));
        assert!(a.extra.contains_key("response_mapping"));

        let back = serde_json::to_value(&a).unwrap();
        assert_eq!(back["response_mapping"], value["response_mapping"]);
        assert_eq!(back["x-translator"]["component"], "KP");
    }

    #[test]
    fn digest_tracks_content() {
        let a = Association::from_record_fields("treats", None, Some("A"), None, None);
        let b = a.clone();
        let c = Association::from_record_fields("treats", None, Some("B"), None, None);
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        assert_ne!(a.digest().unwrap(), c.digest().unwrap());
    }
}
