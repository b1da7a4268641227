//! Batch freezing and packing.
//!
//! A package is the JSON array `[associations, record, record, ...]`: every
//! distinct association appears once in the leading table and each record (in
//! minimal form) points at its entry through `apiEdge`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::association::Association;
use crate::config::RecordConfig;
use crate::error::{RecordError, Result};
use crate::query::QueryEdge;
use crate::record::{FrozenRecord, Record};

/// A minimal-tier record plus the index of its association in the package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedRecord {
    #[serde(flatten)]
    pub record: FrozenRecord,
    #[serde(rename = "apiEdge")]
    pub association_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPackage {
    pub associations: Vec<Association>,
    pub records: Vec<PackedRecord>,
}

impl RecordPackage {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| RecordError::MalformedPackage(e.to_string()))
    }
}

impl Serialize for RecordPackage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len() + 1))?;
        seq.serialize_element(&self.associations)?;
        for record in &self.records {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RecordPackage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PackageVisitor;

        impl<'de> Visitor<'de> for PackageVisitor {
            type Value = RecordPackage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of [associations, ...packed records]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<RecordPackage, A::Error> {
                let associations: Vec<Association> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(record) = seq.next_element::<PackedRecord>()? {
                    records.push(record);
                }
                Ok(RecordPackage {
                    associations,
                    records,
                })
            }
        }

        deserializer.deserialize_seq(PackageVisitor)
    }
}

/// Compact-tier copies of `records`.
pub fn freeze_records(records: &[Record]) -> Vec<FrozenRecord> {
    records.iter().map(Record::freeze).collect()
}

pub fn unfreeze_records(records: Vec<FrozenRecord>, config: Arc<RecordConfig>) -> Result<Vec<Record>> {
    records
        .into_iter()
        .map(|frozen| Record::builder(frozen).config(Arc::clone(&config)).build())
        .collect()
}

/// Pack records, storing each distinct association once.
pub fn pack_records(records: &[Record]) -> Result<RecordPackage> {
    let mut index_by_digest: HashMap<String, usize> = HashMap::new();
    let mut associations = Vec::new();
    let mut packed = Vec::with_capacity(records.len());

    for record in records {
        let digest = record.association_digest()?;
        let association_index = *index_by_digest.entry(digest).or_insert_with(|| {
            associations.push(record.association().clone());
            associations.len() - 1
        });
        packed.push(PackedRecord {
            record: record.freeze_minimal(),
            association_index,
        });
    }

    debug!(
        records = packed.len(),
        associations = associations.len(),
        "packed records"
    );
    Ok(RecordPackage {
        associations,
        records: packed,
    })
}

/// Rebuild records from a package.
///
/// Records bind to `query_edge` when given; otherwise each gets a synthetic
/// edge derived from its own frozen shape.
pub fn unpack_records(
    package: RecordPackage,
    query_edge: Option<Arc<dyn QueryEdge>>,
    config: Arc<RecordConfig>,
) -> Result<Vec<Record>> {
    let RecordPackage {
        associations,
        records,
    } = package;
    let count = records.len();

    let unpacked = records
        .into_iter()
        .enumerate()
        .map(|(position, packed)| {
            let association = associations
                .get(packed.association_index)
                .cloned()
                .ok_or(RecordError::AssociationIndex {
                    record: position,
                    index: packed.association_index,
                    len: associations.len(),
                })?;
            let mut builder = Record::builder(packed.record)
                .config(Arc::clone(&config))
                .association(association);
            if let Some(edge) = &query_edge {
                builder = builder.query_edge(Arc::clone(edge));
            }
            builder.build()
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(records = count, associations = associations.len(), "unpacked records");
    Ok(unpacked)
}
