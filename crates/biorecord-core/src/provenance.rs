//! Provenance chains: which knowledge sources an assertion passed through.

use serde::{Deserialize, Serialize};

pub const PRIMARY_KNOWLEDGE_SOURCE: &str = "primary_knowledge_source";
pub const AGGREGATOR_KNOWLEDGE_SOURCE: &str = "aggregator_knowledge_source";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceChainItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub resource_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_resource_ids: Option<Vec<String>>,
}

impl ProvenanceChainItem {
    pub fn primary(resource_id: Option<&str>) -> Self {
        Self {
            resource_id: resource_id.map(str::to_string),
            resource_role: PRIMARY_KNOWLEDGE_SOURCE.to_string(),
            upstream_resource_ids: None,
        }
    }

    pub fn aggregator(resource_id: Option<&str>, upstream: Option<&str>) -> Self {
        Self {
            resource_id: resource_id.map(str::to_string),
            resource_role: AGGREGATOR_KNOWLEDGE_SOURCE.to_string(),
            upstream_resource_ids: Some(upstream.into_iter().map(str::to_string).collect()),
        }
    }
}

/// Inputs for [`derive_chain`], borrowed from a record.
#[derive(Debug, Clone, Copy)]
pub struct ChainSources<'a> {
    pub api_infores: Option<&'a str>,
    pub meta_edge_source: Option<&'a str>,
    pub api_is_primary_knowledge_source: bool,
    /// Chain supplied by the API response itself, if any.
    pub explicit: Option<&'a [ProvenanceChainItem]>,
    /// Infores id of the aggregator serving this record.
    pub final_aggregator: &'a str,
}

/// Build the chain ending with `final_aggregator`.
///
/// An explicit chain is used as-is. Otherwise the primary source is the API
/// itself when it is primary, else the meta-edge source with the API recorded as
/// an aggregator over it.
pub fn derive_chain(sources: ChainSources<'_>) -> Vec<ProvenanceChainItem> {
    let mut chain = match sources.explicit {
        Some(items) => items.to_vec(),
        None if sources.api_is_primary_knowledge_source => {
            vec![ProvenanceChainItem::primary(sources.api_infores)]
        }
        None => vec![
            ProvenanceChainItem::primary(sources.meta_edge_source),
            ProvenanceChainItem::aggregator(sources.api_infores, sources.meta_edge_source),
        ],
    };
    chain.push(ProvenanceChainItem::aggregator(
        Some(sources.final_aggregator),
        sources.api_infores,
    ));
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(primary: bool) -> ChainSources<'static> {
        ChainSources {
            api_infores: Some("infores:mychem-info"),
            meta_edge_source: Some("infores:chembl"),
            api_is_primary_knowledge_source: primary,
            explicit: None,
            final_aggregator: "infores:biothings-explorer",
        }
    }

    #[test]
    fn aggregated_api_yields_three_links() {
        let chain = derive_chain(sources(false));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], ProvenanceChainItem::primary(Some("infores:chembl")));
        assert_eq!(
            chain[1].upstream_resource_ids.as_deref(),
            Some(&["infores:chembl".to_string()][..])
        );
        assert_eq!(chain[2].resource_id.as_deref(), Some("infores:biothings-explorer"));
        assert_eq!(
            chain[2].upstream_resource_ids.as_deref(),
            Some(&["infores:mychem-info".to_string()][..])
        );
    }

    #[test]
    fn primary_api_yields_two_links() {
        let chain = derive_chain(sources(true));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].resource_id.as_deref(), Some("infores:mychem-info"));
        assert_eq!(chain[0].resource_role, PRIMARY_KNOWLEDGE_SOURCE);
    }

    #[test]
    fn explicit_chain_is_kept_and_extended() {
        let explicit = vec![
            ProvenanceChainItem::primary(Some("infores:a")),
            ProvenanceChainItem::aggregator(Some("infores:b"), Some("infores:a")),
        ];
        let chain = derive_chain(ChainSources {
            explicit: Some(&explicit),
            ..sources(false)
        });
        assert_eq!(&chain[..2], &explicit[..]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn missing_infores_leaves_upstream_empty() {
        let chain = derive_chain(ChainSources {
            api_infores: None,
            ..sources(true)
        });
        assert_eq!(chain[0].resource_id, None);
        assert_eq!(chain[1].upstream_resource_ids, Some(Vec::new()));
    }
}
