//! Record configuration.
//!
//! The JSON keys match what orchestration layers already pass around:
//!
//! ```json
//! { "EDGE_ATTRIBUTES_USED_IN_RECORD_HASH": ["biolink:evidence_count"],
//!   "provenanceUsesServiceProvider": false }
//! ```
//!
//! Unknown keys are ignored so a larger application config can be handed in
//! as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RecordError, Result};

/// Infores id appended to every provenance chain by default.
pub const BIOTHINGS_EXPLORER_INFORES: &str = "infores:biothings-explorer";

/// Infores id appended instead when `provenanceUsesServiceProvider` is set.
pub const SERVICE_PROVIDER_INFORES: &str = "infores:service-provider-trapi";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// `attribute_type_id`s whose values participate in `recordHash`.
    #[serde(rename = "EDGE_ATTRIBUTES_USED_IN_RECORD_HASH", default)]
    pub edge_attributes_used_in_record_hash: Vec<String>,
    /// Select the service-provider aggregator as the final provenance link.
    #[serde(rename = "provenanceUsesServiceProvider", default)]
    pub provenance_uses_service_provider: bool,
}

impl RecordConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| RecordError::InvalidConfig(e.to_string()))
    }

    /// Validate an already-parsed JSON config value.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| RecordError::InvalidConfig(e.to_string()))
    }

    pub fn with_hashed_attributes<I, S>(mut self, type_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_attributes_used_in_record_hash
            .extend(type_ids.into_iter().map(Into::into));
        self
    }

    pub fn with_service_provider(mut self, enabled: bool) -> Self {
        self.provenance_uses_service_provider = enabled;
        self
    }

    /// Whether an attribute with this type id contributes to `recordHash`.
    pub fn hashes_attribute(&self, attribute_type_id: &str) -> bool {
        self.edge_attributes_used_in_record_hash
            .iter()
            .any(|id| id == attribute_type_id)
    }

    /// The aggregator that closes every derived provenance chain.
    pub fn final_aggregator(&self) -> &'static str {
        if self.provenance_uses_service_provider {
            SERVICE_PROVIDER_INFORES
        } else {
            BIOTHINGS_EXPLORER_INFORES
        }
    }
}
