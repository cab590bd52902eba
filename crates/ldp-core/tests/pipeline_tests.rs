//! End-to-end partitioning tests over the full core pipeline

use ldp_core::{
    FieldRules, FieldType, FieldValue, Normalizer, Pipeline, RawRecord, Rule, Schema,
};
use serde_json::json;

fn raw(value: serde_json::Value) -> RawRecord {
    value.as_object().expect("object literal").clone()
}

fn pipeline() -> Pipeline {
    let schema: Schema = [
        ("key".to_string(), FieldType::String),
        ("title".to_string(), FieldType::String),
        ("author_name".to_string(), FieldType::String),
        ("first_publish_year".to_string(), FieldType::Integer),
        ("has_fulltext".to_string(), FieldType::Boolean),
        ("ratings_count".to_string(), FieldType::Integer),
    ]
    .into_iter()
    .collect();

    let rules = vec![
        FieldRules {
            field: "key".to_string(),
            checks: vec![Rule::NotNull],
        },
        FieldRules {
            field: "title".to_string(),
            checks: vec![Rule::NotNull, Rule::MinLength(1)],
        },
    ];

    Pipeline::new(Normalizer::with_default_sentinels(), schema, rules, "key")
}

#[test]
fn three_record_scenario() {
    // One valid record, one duplicate of it, one missing a not-null field.
    let batch = vec![
        raw(json!({
            "key": "/works/OL1W",
            "title": "  Dune  ",
            "author_name": ["Frank Herbert"],
            "first_publish_year": "1965",
            "has_fulltext": "true",
        })),
        raw(json!({
            "key": "/works/OL1W",
            "title": "Dune (duplicate)",
        })),
        raw(json!({
            "key": "/works/OL2W",
            "title": "N/A",
        })),
    ];

    let result = pipeline().partition(&batch);

    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.rejected.len(), 1);
    assert_eq!(result.total(), 2);

    let accepted = &result.accepted[0];
    assert_eq!(
        accepted.get("title"),
        Some(&FieldValue::Str("Dune".to_string()))
    );
    assert_eq!(
        accepted.get("author_name"),
        Some(&FieldValue::Str("Frank Herbert".to_string()))
    );
    assert_eq!(
        accepted.get("first_publish_year"),
        Some(&FieldValue::Int(1965))
    );
    assert_eq!(accepted.get("has_fulltext"), Some(&FieldValue::Bool(true)));

    // The "N/A" title was normalized to null and tripped both title rules.
    let rejected = &result.rejected[0];
    assert_eq!(
        rejected.record.get("key"),
        Some(&FieldValue::Str("/works/OL2W".to_string()))
    );
    assert_eq!(rejected.violations[0].field, "title");
    assert_eq!(rejected.violations[0].rule, Rule::NotNull);

    // The duplicate appears in neither bucket.
    let dup_titles: Vec<_> = result
        .accepted
        .iter()
        .chain(result.rejected.iter().map(|r| &r.record))
        .filter_map(|r| r.get("title"))
        .filter(|t| **t == FieldValue::Str("Dune (duplicate)".to_string()))
        .collect();
    assert!(dup_titles.is_empty());
}

#[test]
fn partitioning_is_idempotent() {
    let batch = vec![
        raw(json!({"key": "OL1W", "title": "Dune", "ratings_count": "7"})),
        raw(json!({"key": "OL2W", "title": "", "ratings_count": "x"})),
        raw(json!({"key": "OL1W", "title": "Dupe"})),
        raw(json!({"title": "Keyless"})),
    ];

    let pipeline = pipeline();
    let first = pipeline.partition(&batch);
    let second = pipeline.partition(&batch);

    assert_eq!(first.accepted, second.accepted);
    assert_eq!(first.rejected, second.rejected);
}

#[test]
fn every_record_gets_exactly_one_verdict() {
    // Hostile batch: empty record, nested junk, missing keys, bad types.
    let batch = vec![
        raw(json!({})),
        raw(json!({"key": "OL1W", "title": ["part", "one"], "first_publish_year": [1, 2]})),
        raw(json!({"key": "  ", "title": "Blank key"})),
        raw(json!({"key": "OL3W", "title": "Fine", "extra_field": "kept"})),
    ];

    let result = pipeline().partition(&batch);
    assert_eq!(result.total(), batch.len());

    // Untyped passthrough: the field outside the schema survives unchanged.
    let fine = result
        .accepted
        .iter()
        .find(|r| r.get("key") == Some(&FieldValue::Str("OL3W".to_string())))
        .expect("record OL3W should be accepted");
    assert_eq!(
        fine.get("extra_field"),
        Some(&FieldValue::Str("kept".to_string()))
    );
}
