//! Record normalization
//!
//! First pipeline stage: flattens list values to delimiter-joined strings,
//! trims whitespace, unifies null-like sentinels to the null marker, and
//! deduplicates the batch by primary key.

use crate::record::{FieldValue, RawRecord, Record};
use serde_json::Value;
use std::collections::HashSet;

/// Delimiter used when flattening list values
pub const LIST_DELIMITER: &str = ", ";

/// Null-like sentinels recognized when no set is configured.
/// Matched case-insensitively against the trimmed value.
pub const DEFAULT_NULL_SENTINELS: &[&str] = &["", "nan", "none", "null", "n/a", "na"];

/// Normalizes raw records into clean records.
///
/// Holds the configured null-sentinel set; everything else about
/// normalization is fixed. Pure: cleaning the same batch twice yields the
/// same output.
#[derive(Debug, Clone)]
pub struct Normalizer {
    sentinels: HashSet<String>,
}

impl Normalizer {
    /// Create a normalizer with a caller-supplied sentinel set.
    /// Sentinels are matched case-insensitively.
    pub fn new<I, S>(sentinels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            sentinels: sentinels
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Create a normalizer with [`DEFAULT_NULL_SENTINELS`]
    pub fn with_default_sentinels() -> Self {
        Self::new(DEFAULT_NULL_SENTINELS.iter().copied())
    }

    /// Clean a single raw value: flatten lists, trim, map sentinels to null.
    pub fn clean_value(&self, value: &Value) -> FieldValue {
        let text = match value {
            Value::Null => return FieldValue::Null,
            Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Vec<_>>()
                .join(LIST_DELIMITER),
            other => scalar_text(other),
        };

        let trimmed = text.trim();
        if self.sentinels.contains(&trimmed.to_lowercase()) {
            FieldValue::Null
        } else {
            FieldValue::Str(trimmed.to_string())
        }
    }

    /// Clean every field of a raw record
    pub fn clean_record(&self, raw: &RawRecord) -> Record {
        raw.iter()
            .map(|(field, value)| (field.clone(), self.clean_value(value)))
            .collect()
    }

    /// Clean a batch and deduplicate it by `primary_key`.
    ///
    /// Iterates in input order and keeps the first record per key. Records
    /// whose key field is absent or null are never deduplicated against each
    /// other; they pass through for the validator to judge.
    pub fn normalize(&self, batch: &[RawRecord], primary_key: &str) -> Vec<Record> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut cleaned = Vec::with_capacity(batch.len());

        for raw in batch {
            let record = self.clean_record(raw);
            match record.get(primary_key) {
                Some(FieldValue::Str(key)) => {
                    if seen.insert(key.clone()) {
                        cleaned.push(record);
                    }
                },
                _ => cleaned.push(record),
            }
        }

        cleaned
    }
}

/// Stringify a scalar JSON value the way it should appear in a flattened
/// field: strings as-is, numbers and booleans via their display form.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
