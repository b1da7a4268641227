//! Error type shared by record construction, configuration and packing.
//!
//! Construction is the only fallible phase: once a [`crate::Record`] exists,
//! every accessor returns a defined value.

/// Errors surfaced by `biorecord-core`.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The input does not have the minimum record shape (subject + object).
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A node carries neither `normalizedInfo` nor a `curie`.
    #[error("malformed {role} node: {message}")]
    MalformedNode { role: &'static str, message: String },

    /// No association was supplied and the record has no `predicate` to build one from.
    #[error("record has no predicate and no association was supplied")]
    MissingPredicate,

    /// Configuration failed validation (e.g. a non-string allow-list entry).
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A record package is not `[associations, ...records]`.
    #[error("malformed record package: {0}")]
    MalformedPackage(String),

    /// A packed record points past the end of the association table.
    #[error("packed record {record} references association {index}, but the package only has {len}")]
    AssociationIndex {
        record: usize,
        index: usize,
        len: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecordError>;
