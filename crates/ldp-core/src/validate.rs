//! Rule evaluation over a cast record
//!
//! Third pipeline stage. Every rule of every field is evaluated (no
//! short-circuit) so the verdict carries the complete violation list, in
//! (field declaration order, rule declaration order).

use crate::record::Record;
use crate::rules::{Rule, RuleSet};
use serde::Serialize;

/// One failed rule, attached to a rejected record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Field the rule was declared for
    pub field: String,
    /// The violated rule
    pub rule: Rule,
    /// Human-readable failure reason
    pub reason: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed {}: {}", self.field, self.rule, self.reason)
    }
}

/// Accept/reject outcome for a single record
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted,
    Rejected(Vec<Violation>),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Validate a cast record against a rule set.
///
/// The record must already be normalized and cast; this function never sees
/// raw data. Always yields exactly one verdict, never an error.
pub fn validate(record: &Record, rules: &RuleSet) -> Verdict {
    let mut violations = Vec::new();

    for field_rules in rules {
        let value = record.get(&field_rules.field);
        for rule in &field_rules.checks {
            if let Err(reason) = rule.check(value) {
                violations.push(Violation {
                    field: field_rules.field.clone(),
                    rule: rule.clone(),
                    reason,
                });
            }
        }
    }

    if violations.is_empty() {
        Verdict::Accepted
    } else {
        Verdict::Rejected(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use crate::rules::FieldRules;

    fn record(fields: &[(&str, FieldValue)]) -> Record {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn clean_record_is_accepted() {
        let rules = vec![FieldRules {
            field: "key".to_string(),
            checks: vec![Rule::NotNull],
        }];
        let rec = record(&[("key", FieldValue::Str("OL1M".to_string()))]);
        assert_eq!(validate(&rec, &rules), Verdict::Accepted);
    }

    #[test]
    fn null_primary_field_yields_not_null_violation() {
        let rules = vec![FieldRules {
            field: "key".to_string(),
            checks: vec![Rule::NotNull],
        }];
        let rec = record(&[("key", FieldValue::Null)]);

        match validate(&rec, &rules) {
            Verdict::Rejected(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "key");
                assert_eq!(violations[0].rule, Rule::NotNull);
            },
            Verdict::Accepted => panic!("record should be rejected"),
        }
    }

    #[test]
    fn all_rules_are_evaluated_without_short_circuit() {
        let rules = vec![
            FieldRules {
                field: "title".to_string(),
                checks: vec![Rule::NotNull, Rule::MinLength(1)],
            },
            FieldRules {
                field: "year".to_string(),
                checks: vec![Rule::GreaterThan(0.0)],
            },
        ];
        let rec = record(&[
            ("title", FieldValue::Null),
            ("year", FieldValue::Int(0)),
        ]);

        match validate(&rec, &rules) {
            Verdict::Rejected(violations) => {
                // Both title rules and the year rule must all be reported,
                // in declaration order.
                assert_eq!(violations.len(), 3);
                assert_eq!(violations[0].rule, Rule::NotNull);
                assert_eq!(violations[1].rule, Rule::MinLength(1));
                assert_eq!(violations[2].field, "year");
            },
            Verdict::Accepted => panic!("record should be rejected"),
        }
    }

    #[test]
    fn absent_field_counts_as_null() {
        let rules = vec![FieldRules {
            field: "missing".to_string(),
            checks: vec![Rule::NotNull],
        }];
        let rec = record(&[("other", FieldValue::Int(1))]);
        assert!(!validate(&rec, &rules).is_accepted());
    }

    #[test]
    fn violation_serializes_for_reject_storage() {
        let violation = Violation {
            field: "year".to_string(),
            rule: Rule::GreaterThan(0.0),
            reason: "value 0 is not greater than 0".to_string(),
        };
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["field"], "year");
        assert_eq!(json["rule"]["greater_than"], 0.0);
    }
}
