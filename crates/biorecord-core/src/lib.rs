//! Biorecord core: knowledge-graph edge records
//!
//! A record is one directed biomedical assertion (`subject -predicate-> object`)
//! produced by federating an external API, together with the metadata needed to
//! cache, deduplicate and re-orient it:
//!
//! ```text
//!   raw API node/edge JSON ──► FrozenRecord ──► Record ──► freeze_verbose / freeze / freeze_minimal
//!                                   ▲              │
//!                                   │              ├─► record_hash (content identity)
//!                                   │              ├─► reverse / query_direction
//!                                   │              ├─► provenance_chain
//!                                   └──────────────┴─► pack_records / unpack_records
//! ```
//!
//! - **Identity**: `record_hash` is a digest over canonical content, stable across
//!   restarts and qualifier ordering.
//! - **Tiers**: three serialization forms trade size for completeness; any of
//!   them reloads into a `Record`.
//! - **Reversal**: predicates and directional qualifiers are re-derived; reversing
//!   twice is the identity.
//! - **Packing**: records sharing source-API edge metadata store it once.
//!
//! This crate does no I/O. Identifier normalization and the query graph are
//! supplied by callers (see [`NormalizedInfo`] and [`QueryEdge`]).

pub mod association;
pub mod biolink;
pub mod config;
pub mod digest;
pub mod error;
pub mod node;
pub mod pack;
pub mod provenance;
pub mod query;
pub mod record;
pub mod response;


pub use association::{Association, Qualifiers, XTranslator};
pub use biolink::PredicateInverses;
pub use config::RecordConfig;
pub use error::{RecordError, Result};
pub use node::{FrozenNode, MinimalFrozenNode, NodeShape, NormalizedInfo, RecordNode, VerboseFrozenNode};
pub use pack::{freeze_records, pack_records, unfreeze_records, unpack_records, PackedRecord, RecordPackage};
pub use provenance::ProvenanceChainItem;
pub use query::{EdgeSide, QueryEdge, QueryNode, SyntheticQueryEdge, SyntheticQueryNode};
pub use record::{FrozenRecord, Record, RecordBuilder};
pub use response::{EdgeAttribute, MappedResponse};
