//! LDP Core Library
//!
//! The pure record-processing core of the LDP ingestion pipeline. Given a raw
//! batch fetched from an API source, the core normalizes, type-casts, and
//! validates every record, partitioning the batch into accepted records and
//! rejected records with structured violation reports.
//!
//! The core is synchronous, allocation-only, and deterministic: the same
//! batch with the same schema and rule set always produces the same
//! partition. Per-record failures are absorbed into that record's verdict;
//! nothing in this crate returns an error or panics on malformed data.
//!
//! # Example
//!
//! ```
//! use ldp_core::{FieldRules, FieldType, Normalizer, Pipeline, Rule};
//!
//! let schema = [("key".to_string(), FieldType::String)].into_iter().collect();
//! let rules = vec![FieldRules {
//!     field: "key".to_string(),
//!     checks: vec![Rule::NotNull],
//! }];
//! let pipeline = Pipeline::new(Normalizer::with_default_sentinels(), schema, rules, "key");
//!
//! let raw: ldp_core::RawRecord =
//!     serde_json::from_str(r#"{"key": "OL1M", "title": " Dune "}"#).unwrap();
//! let result = pipeline.partition(&[raw]);
//! assert_eq!(result.accepted.len(), 1);
//! ```

pub mod normalize;
pub mod partition;
pub mod record;
pub mod rules;
pub mod schema;
pub mod validate;

pub use normalize::{Normalizer, DEFAULT_NULL_SENTINELS, LIST_DELIMITER};
pub use partition::{Partitioned, Pipeline, Rejected};
pub use record::{FieldValue, RawRecord, Record};
pub use rules::{FieldRules, Literal, Rule, RuleSet};
pub use schema::{cast_record, FieldType, Schema};
pub use validate::{validate, Verdict, Violation};
