//! Reconciliation of competing values reported by different data sources.
//!
//! Every candidate carries the name of the source it came from and the
//! moment it was observed. The winner is the candidate from the most
//! authoritative source; among equally authoritative sources the most
//! recent observation wins. Values are never blended.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Authority of each known source, higher wins. Unknown sources rank 0.
pub const SOURCE_PRIORITY: [(&str, u32); 6] = [
    ("manual", 200),
    ("ppa", 100),
    ("apt", 80),
    ("theslice", 60),
    ("novolleys", 40),
    ("seed", 20),
];

/// A value as reported by one source at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedRecord<T> {
    pub source: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> SourcedRecord<T> {
    pub fn new(source: impl Into<String>, data: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            source: source.into(),
            data,
            timestamp,
        }
    }

    fn rank(&self) -> (Reverse<u32>, Reverse<DateTime<Utc>>) {
        (Reverse(source_priority(&self.source)), Reverse(self.timestamp))
    }
}

pub fn source_priority(source: &str) -> u32 {
    SOURCE_PRIORITY
        .iter()
        .find(|(name, _)| *name == source)
        .map(|(_, priority)| *priority)
        .unwrap_or(0)
}

/// Whether data from `new_source` should replace data from `existing_source`.
/// Equal priority favours the newcomer.
pub fn should_override(new_source: &str, existing_source: &str) -> bool {
    source_priority(new_source) >= source_priority(existing_source)
}

/// Pick the authoritative value among competing records.
///
/// Returns `None` only for an empty input. Exact ties (same priority and
/// timestamp) keep the earliest record in input order.
pub fn resolve_conflict<T>(records: Vec<SourcedRecord<T>>) -> Option<T> {
    records
        .into_iter()
        .min_by(|a, b| a.rank().cmp(&b.rank()))
        .map(|record| record.data)
}

/// Merge partial JSON objects field by field.
///
/// Null fields are treated as absent. Each field present in at least one
/// record is resolved independently; fields absent everywhere are omitted.
pub fn merge_records(records: Vec<SourcedRecord<Map<String, Value>>>) -> Map<String, Value> {
    let mut candidates: BTreeMap<String, Vec<SourcedRecord<Value>>> = BTreeMap::new();

    for record in records {
        for (field, value) in record.data {
            if value.is_null() {
                continue;
            }
            candidates
                .entry(field)
                .or_default()
                .push(SourcedRecord::new(record.source.clone(), value, record.timestamp));
        }
    }

    candidates
        .into_iter()
        .filter_map(|(field, values)| resolve_conflict(values).map(|value| (field, value)))
        .collect()
}

/// Typed front-end to [`merge_records`] for structs whose fields are all
/// optional (partial records).
pub fn merge_partials<T>(records: Vec<SourcedRecord<T>>) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let objects = records
        .into_iter()
        .map(|record| {
            let object = to_object(&record.data)?;
            Ok(SourcedRecord::new(record.source, object, record.timestamp))
        })
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_records(objects);
    serde_json::from_value(Value::Object(merged)).context("Failed to rebuild merged record")
}

fn to_object<T: Serialize>(data: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(data).context("Failed to serialize partial record")? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("Partial record must be an object, got {}", other),
    }
}
