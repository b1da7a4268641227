//! Command plumbing: JSON in, records through `biorecord-core`, JSON out.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use biorecord_core::{
    pack_records, unpack_records, FrozenRecord, Record, RecordConfig, RecordPackage,
};
use clap::ValueEnum;
use serde_json::Value;
use tracing::{debug, info};

/// Serialization tier for `freeze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tier {
    Full,
    Compact,
    Minimal,
}

/// Read JSON from `path`, or stdin when `path` is `-`.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing JSON from {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<Arc<RecordConfig>> {
    let Some(path) = path else {
        return Ok(Arc::new(RecordConfig::default()));
    };
    let value = read_json(path)?;
    let config = RecordConfig::from_value(value)
        .with_context(|| format!("loading config {}", path.display()))?;
    debug!(
        hashed_attributes = config.edge_attributes_used_in_record_hash.len(),
        service_provider = config.provenance_uses_service_provider,
        "loaded config"
    );
    Ok(Arc::new(config))
}

/// Build records from a single record object or an array of them.
pub fn records_from_value(value: Value, config: &Arc<RecordConfig>) -> Result<Vec<Record>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        other => return Err(anyhow!("expected a record or an array of records, got {other}")),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let frozen = FrozenRecord::from_value(item).with_context(|| format!("record {i}"))?;
            Record::builder(frozen)
                .config(Arc::clone(config))
                .build()
                .with_context(|| format!("record {i}"))
        })
        .collect()
}

pub fn load_records(path: &Path, config: &Arc<RecordConfig>) -> Result<Vec<Record>> {
    let records = records_from_value(read_json(path)?, config)?;
    info!(count = records.len(), input = %path.display(), "loaded records");
    Ok(records)
}

pub fn hashes(records: &[Record]) -> Vec<String> {
    records.iter().map(Record::record_hash).collect()
}

pub fn freeze(records: &[Record], tier: Tier) -> Result<Value> {
    let frozen: Vec<FrozenRecord> = records
        .iter()
        .map(|record| match tier {
            Tier::Full => record.freeze_verbose(),
            Tier::Compact => record.freeze(),
            Tier::Minimal => record.freeze_minimal(),
        })
        .collect();
    Ok(serde_json::to_value(frozen)?)
}

pub fn reverse(records: &[Record]) -> Result<Value> {
    let reversed: Vec<FrozenRecord> = records
        .iter()
        .map(|record| record.reverse().freeze_verbose())
        .collect();
    Ok(serde_json::to_value(reversed)?)
}

pub fn provenance(records: &[Record]) -> Result<Value> {
    let chains: Vec<_> = records.iter().map(Record::provenance_chain).collect();
    Ok(serde_json::to_value(chains)?)
}

pub fn pack(records: &[Record]) -> Result<Value> {
    let package = pack_records(records)?;
    info!(
        records = package.len(),
        associations = package.associations.len(),
        "packed"
    );
    Ok(serde_json::to_value(&package)?)
}

pub fn unpack(value: Value, config: &Arc<RecordConfig>) -> Result<Value> {
    let package = RecordPackage::from_value(value)?;
    let records = unpack_records(package, None, Arc::clone(config))?;
    freeze(&records, Tier::Full)
}

pub fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut out = io::stdout().lock();
    writeln!(out, "{text}")?;
    Ok(())
}
