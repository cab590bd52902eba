//! Schema-driven type coercion
//!
//! Second pipeline stage: coerces cleaned string fields into their declared
//! semantic types. Coercion never fails loudly; a value that cannot be
//! converted becomes null, and validation rules are the mechanism that
//! catches it.

use crate::record::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
}

/// Field name to declared type. Ordered so the loader emits columns
/// deterministically.
pub type Schema = BTreeMap<String, FieldType>;

const TRUE_TOKENS: &[&str] = &["true", "1", "yes"];
const FALSE_TOKENS: &[&str] = &["false", "0", "no"];

impl FieldType {
    /// Coerce a cleaned value into this type.
    ///
    /// Null stays null regardless of type; conversion failure is absorbed
    /// into null rather than signaled.
    pub fn cast(self, value: &FieldValue) -> FieldValue {
        if value.is_null() {
            return FieldValue::Null;
        }

        match self {
            FieldType::String => match value {
                FieldValue::Str(s) => FieldValue::Str(s.clone()),
                other => FieldValue::Str(other.to_string()),
            },
            FieldType::Integer => match value {
                FieldValue::Int(i) => FieldValue::Int(*i),
                FieldValue::Str(s) => s
                    .parse::<i64>()
                    .map(FieldValue::Int)
                    .unwrap_or(FieldValue::Null),
                _ => FieldValue::Null,
            },
            FieldType::Float => match value {
                FieldValue::Float(f) => FieldValue::Float(*f),
                FieldValue::Int(i) => FieldValue::Float(*i as f64),
                FieldValue::Str(s) => s
                    .parse::<f64>()
                    .map(FieldValue::Float)
                    .unwrap_or(FieldValue::Null),
                _ => FieldValue::Null,
            },
            FieldType::Boolean => match value {
                FieldValue::Bool(b) => FieldValue::Bool(*b),
                FieldValue::Str(s) => {
                    let token = s.to_lowercase();
                    if TRUE_TOKENS.contains(&token.as_str()) {
                        FieldValue::Bool(true)
                    } else if FALSE_TOKENS.contains(&token.as_str()) {
                        FieldValue::Bool(false)
                    } else {
                        FieldValue::Null
                    }
                },
                _ => FieldValue::Null,
            },
        }
    }
}

/// Cast every schema-declared field of a clean record.
///
/// Fields absent from the schema pass through unchanged; fields declared in
/// the schema but missing from the record stay missing (the NotNull rule is
/// what rejects them).
pub fn cast_record(record: &Record, schema: &Schema) -> Record {
    record
        .iter()
        .map(|(field, value)| {
            let cast = match schema.get(field) {
                Some(field_type) => field_type.cast(value),
                None => value.clone(),
            };
            (field.clone(), cast)
        })
        .collect()
}
