//! Biolink namespace helpers and predicate inversion.
//!
//! Predicates and qualifier types are stored without the `biolink:` prefix and
//! gain it only when read. Real query edges answer "what is the inverse of this
//! predicate" from the full Biolink model; records built without a query edge
//! fall back to the table below.

use std::collections::HashMap;

use tracing::debug;

pub const BIOLINK_PREFIX: &str = "biolink:";

/// Drop a leading `biolink:` if present.
pub fn strip_prefix(value: &str) -> &str {
    value.strip_prefix(BIOLINK_PREFIX).unwrap_or(value)
}

/// `biolink:<value>`, without doubling an existing prefix.
pub fn with_prefix(value: &str) -> String {
    format!("{BIOLINK_PREFIX}{}", strip_prefix(value))
}

/// Directed predicate pairs; each entry is inverted both ways.
const INVERSE_PAIRS: &[(&str, &str)] = &[
    ("treats", "treated_by"),
    ("causes", "caused_by"),
    ("contributes_to", "has_contributor"),
    ("affects", "affected_by"),
    ("regulates", "regulated_by"),
    ("has_part", "part_of"),
    ("subclass_of", "superclass_of"),
    ("has_phenotype", "phenotype_of"),
    ("expressed_in", "expresses"),
    ("located_in", "location_of"),
    ("has_participant", "participates_in"),
    ("produces", "produced_by"),
    ("has_gene_product", "gene_product_of"),
    ("disrupts", "disrupted_by"),
    ("prevents", "prevented_by"),
    ("has_input", "is_input_of"),
    ("has_output", "is_output_of"),
    ("derives_from", "derives_into"),
    ("in_taxon", "taxon_of"),
    ("occurs_in", "contains_process"),
    ("enables", "enabled_by"),
    ("capable_of", "can_be_carried_out_by"),
    (
        "gene_associated_with_condition",
        "condition_associated_with_gene",
    ),
];

const SYMMETRIC: &[&str] = &[
    "related_to",
    "associated_with",
    "correlated_with",
    "interacts_with",
    "physically_interacts_with",
    "directly_physically_interacts_with",
    "genetically_interacts_with",
    "coexpressed_with",
    "similar_to",
    "same_as",
    "close_match",
    "exact_match",
];

fn builtin_inverse(predicate: &str) -> Option<&'static str> {
    if let Some(&sym) = SYMMETRIC.iter().find(|p| **p == predicate) {
        return Some(sym);
    }
    INVERSE_PAIRS.iter().find_map(|&(a, b)| {
        if a == predicate {
            Some(b)
        } else if b == predicate {
            Some(a)
        } else {
            None
        }
    })
}

/// Predicate inverse lookup: custom pairs first, then the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateInverses {
    custom: HashMap<String, String>,
}

impl PredicateInverses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `a` and `b` as inverses of each other.
    pub fn with_pair(mut self, a: &str, b: &str) -> Self {
        let (a, b) = (strip_prefix(a).to_string(), strip_prefix(b).to_string());
        self.custom.insert(a.clone(), b.clone());
        self.custom.insert(b, a);
        self
    }

    /// Unprefixed inverse of `predicate`, if one is known.
    pub fn inverse(&self, predicate: &str) -> Option<String> {
        let predicate = strip_prefix(predicate);
        self.custom
            .get(predicate)
            .cloned()
            .or_else(|| builtin_inverse(predicate).map(str::to_string))
    }

    /// Unprefixed inverse of `predicate`; unknown predicates invert to themselves.
    pub fn inverse_or_self(&self, predicate: &str) -> String {
        match self.inverse(predicate) {
            Some(inverse) => inverse,
            None => {
                debug!(predicate, "no known inverse, treating predicate as self-inverse");
                strip_prefix(predicate).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_helpers_do_not_double() {
        assert_eq!(with_prefix("treats"), "biolink:treats");
        assert_eq!(with_prefix("biolink:treats"), "biolink:treats");
        assert_eq!(strip_prefix("biolink:treats"), "treats");
        assert_eq!(strip_prefix("treats"), "treats");
    }

    #[test]
    fn builtin_pairs_invert_both_ways() {
        let inverses = PredicateInverses::new();
        assert_eq!(inverses.inverse("treats").as_deref(), Some("treated_by"));
        assert_eq!(inverses.inverse("biolink:treated_by").as_deref(), Some("treats"));
        assert_eq!(inverses.inverse("interacts_with").as_deref(), Some("interacts_with"));
    }

    #[test]
    fn custom_pairs_take_precedence() {
        let inverses = PredicateInverses::new().with_pair("treats", "is_treatment_for");
        assert_eq!(inverses.inverse("treats").as_deref(), Some("is_treatment_for"));
        assert_eq!(inverses.inverse("is_treatment_for").as_deref(), Some("treats"));
    }

    #[test]
    fn unknown_predicates_are_self_inverse() {
        let inverses = PredicateInverses::new();
        assert_eq!(inverses.inverse("somePredicate"), None);
        assert_eq!(inverses.inverse_or_self("biolink:somePredicate"), "somePredicate");
    }

    #[test]
    fn table_is_an_involution() {
        let inverses = PredicateInverses::new();
        for (a, b) in INVERSE_PAIRS {
            let once = inverses.inverse_or_self(a);
            assert_eq!(&once, b);
            assert_eq!(inverses.inverse_or_self(&once), *a);
        }
    }
}
