//! Record representations shared by all pipeline stages

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A record as handed over by the fetch collaborator: field name to
/// dynamically-typed JSON value (scalar, null, or list of scalars).
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A record inside the pipeline.
///
/// The normalizer produces records holding only [`FieldValue::Str`] and
/// [`FieldValue::Null`]; after casting, any variant may appear. The map is
/// ordered so downstream iteration is deterministic.
pub type Record = BTreeMap<String, FieldValue>;

/// A single field's value after normalization or casting.
///
/// Serialized untagged, so reject payloads round-trip as natural JSON
/// (`null`, `true`, `42`, `3.5`, `"text"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The canonical null marker replacing all source-specific sentinels
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    /// True for the null marker
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Character count of a text value. Non-text values have no length.
    pub fn text_len(&self) -> Option<usize> {
        match self {
            FieldValue::Str(s) => Some(s.chars().count()),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Str(s) => write!(f, "{}", s),
        }
    }
}
