//! Batch partitioning
//!
//! Drives normalizer -> caster -> validator over a raw batch and splits it
//! into accepted and rejected records. An error in any single record is
//! absorbed into that record's verdict; the batch itself never fails.

use crate::normalize::Normalizer;
use crate::record::{RawRecord, Record};
use crate::rules::RuleSet;
use crate::schema::{cast_record, Schema};
use crate::validate::{validate, Verdict, Violation};
use tracing::debug;

/// A record that failed validation, with its violation report
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    /// The cast record as it was validated
    pub record: Record,
    /// Violations in declaration order
    pub violations: Vec<Violation>,
}

/// Result of partitioning one batch
#[derive(Debug, Clone, Default)]
pub struct Partitioned {
    /// Records that passed every rule, in post-dedup input order
    pub accepted: Vec<Record>,
    /// Records with at least one violation, in post-dedup input order
    pub rejected: Vec<Rejected>,
}

impl Partitioned {
    /// Total records that survived deduplication
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

/// The configured processing pipeline for one source.
///
/// Holds the source's normalizer, field schema, rule set, and primary-key
/// field. All state is read-only; partitioning the same batch twice yields
/// an identical result.
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: Normalizer,
    schema: Schema,
    rules: RuleSet,
    primary_key: String,
}

impl Pipeline {
    pub fn new(
        normalizer: Normalizer,
        schema: Schema,
        rules: RuleSet,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            normalizer,
            schema,
            rules,
            primary_key: primary_key.into(),
        }
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Partition a raw batch into accepted and rejected records.
    pub fn partition(&self, batch: &[RawRecord]) -> Partitioned {
        let cleaned = self.normalizer.normalize(batch, &self.primary_key);
        let deduplicated = cleaned.len();

        let mut result = Partitioned::default();
        for record in cleaned {
            let cast = cast_record(&record, &self.schema);
            match validate(&cast, &self.rules) {
                Verdict::Accepted => result.accepted.push(cast),
                Verdict::Rejected(violations) => result.rejected.push(Rejected {
                    record: cast,
                    violations,
                }),
            }
        }

        debug!(
            input = batch.len(),
            deduplicated,
            accepted = result.accepted.len(),
            rejected = result.rejected.len(),
            "partitioned batch"
        );

        result
    }
}
