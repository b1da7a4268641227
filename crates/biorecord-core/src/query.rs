//! Query-graph context a record is bound to.
//!
//! Orchestration owns the real query edges and nodes; records only see them
//! through [`QueryEdge`] / [`QueryNode`]. Records built without one (hand-made
//! records, records reloaded from a cache) get a [`SyntheticQueryEdge`] derived
//! from their own frozen shape, so the rest of the crate never branches on
//! "real vs synthetic".

use std::fmt;

use crate::biolink::PredicateInverses;
use crate::digest::digest_hex;
use crate::record::FrozenRecord;

/// Id reported by every [`SyntheticQueryEdge`].
pub const SYNTHETIC_EDGE_ID: &str = "fakeEdge";

pub trait QueryNode: fmt::Debug + Send + Sync {
    fn id(&self) -> Option<&str>;
    fn is_set(&self) -> bool;
}

pub trait QueryEdge: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;
    fn input_node(&self) -> &dyn QueryNode;
    fn output_node(&self) -> &dyn QueryNode;
    /// Whether execution runs opposite to the query's subject -> object direction.
    fn is_reversed(&self) -> bool;
    fn hashed_edge_representation(&self) -> String;
    /// Inverse of an unprefixed predicate, also unprefixed.
    fn reversed_predicate(&self, predicate: &str) -> String;

    fn node(&self, side: EdgeSide) -> &dyn QueryNode {
        match side {
            EdgeSide::Input => self.input_node(),
            EdgeSide::Output => self.output_node(),
        }
    }
}

/// Which end of a query edge a record node is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeSide {
    Input,
    Output,
}

impl EdgeSide {
    pub fn flipped(self) -> Self {
        match self {
            EdgeSide::Input => EdgeSide::Output,
            EdgeSide::Output => EdgeSide::Input,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntheticQueryNode {
    id: Option<String>,
    is_set: bool,
}

impl SyntheticQueryNode {
    pub fn new(id: Option<String>, is_set: bool) -> Self {
        Self { id, is_set }
    }
}

impl QueryNode for SyntheticQueryNode {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn is_set(&self) -> bool {
        self.is_set
    }
}

/// Stand-in query edge for records that arrive without one.
///
/// Its hashed representation is only meant to give ad-hoc records some
/// identity; it is not comparable with a real edge's representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticQueryEdge {
    input: SyntheticQueryNode,
    output: SyntheticQueryNode,
    hashed_representation: String,
    inverses: PredicateInverses,
}

impl SyntheticQueryEdge {
    pub fn new(
        input: SyntheticQueryNode,
        output: SyntheticQueryNode,
        hashed_representation: String,
    ) -> Self {
        Self {
            input,
            output,
            hashed_representation,
            inverses: PredicateInverses::default(),
        }
    }

    pub fn with_inverses(mut self, inverses: PredicateInverses) -> Self {
        self.inverses = inverses;
        self
    }

    /// Derive an edge from a frozen record's subject/object query-node hints.
    pub fn for_record(record: &FrozenRecord) -> Self {
        let input = SyntheticQueryNode::new(
            record.subject.q_node_id().map(str::to_string),
            record.subject.is_set(),
        );
        let output = SyntheticQueryNode::new(
            record.object.q_node_id().map(str::to_string),
            record.object.is_set(),
        );

        let equivalents = record
            .subject
            .equivalent_curies()
            .or_else(|| record.object.equivalent_curies())
            .map(|ids| ids.join(","))
            .unwrap_or_default();
        let content = format!(
            "{}{}{}{}",
            record.subject.semantic_type().join(","),
            record.predicate.as_deref().unwrap_or_default(),
            record.object.semantic_type().join(","),
            equivalents,
        );

        Self::new(input, output, digest_hex(&content))
    }
}

impl QueryEdge for SyntheticQueryEdge {
    fn id(&self) -> &str {
        SYNTHETIC_EDGE_ID
    }

    fn input_node(&self) -> &dyn QueryNode {
        &self.input
    }

    fn output_node(&self) -> &dyn QueryNode {
        &self.output
    }

    fn is_reversed(&self) -> bool {
        false
    }

    fn hashed_edge_representation(&self) -> String {
        self.hashed_representation.clone()
    }

    fn reversed_predicate(&self, predicate: &str) -> String {
        self.inverses.inverse_or_self(predicate)
    }
}
