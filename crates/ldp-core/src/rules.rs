//! Declarative validation rules
//!
//! A closed rule language evaluated against a single field's cast value.
//! Rules are declared in configuration, e.g.:
//!
//! ```yaml
//! rules:
//!   - field: key
//!     checks: [not_null]
//!   - field: ratings_count
//!     checks:
//!       - { greater_than: 0 }
//! ```

use crate::record::FieldValue;
use serde::{Deserialize, Serialize};

/// Scalar literal appearing in equality rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Literal {
    /// Type-aware equality against a cast value. Numeric kinds compare
    /// numerically; mismatched kinds never match; null never matches.
    fn matches(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Literal::Bool(a), FieldValue::Bool(b)) => a == b,
            (Literal::Str(a), FieldValue::Str(b)) => a == b,
            (Literal::Int(_) | Literal::Float(_), FieldValue::Int(_) | FieldValue::Float(_)) => {
                self.as_f64() == value.as_f64()
            },
            _ => false,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(i) => Some(*i as f64),
            Literal::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A single validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Fails on an absent field or the null marker
    NotNull,
    /// Fails unless the cast value equals the literal
    Equals(Literal),
    /// Fails if the cast value equals the literal
    NotEquals(Literal),
    /// Fails if the value is null, non-numeric, or not strictly greater
    GreaterThan(f64),
    /// Fails if the value is null, non-numeric, or not strictly smaller
    LessThan(f64),
    /// Fails if the value is null, non-text, or longer than `n` characters
    MaxLength(usize),
    /// Fails if the value is null, non-text, or shorter than `n` characters
    MinLength(usize),
}

impl Rule {
    /// Evaluate this rule against a field's cast value (`None` = field
    /// absent from the record). `Err` carries the human-readable reason.
    pub fn check(&self, value: Option<&FieldValue>) -> Result<(), String> {
        let present = value.filter(|v| !v.is_null());

        match self {
            Rule::NotNull => match present {
                Some(_) => Ok(()),
                None => Err("value is null".to_string()),
            },
            Rule::Equals(literal) => match present {
                Some(v) if literal.matches(v) => Ok(()),
                Some(v) => Err(format!("value '{}' does not equal '{}'", v, literal)),
                None => Err(format!("value is null, expected '{}'", literal)),
            },
            Rule::NotEquals(literal) => match present {
                Some(v) if literal.matches(v) => Err(format!("value equals '{}'", literal)),
                _ => Ok(()),
            },
            Rule::GreaterThan(bound) => match present.and_then(FieldValue::as_f64) {
                Some(n) if n > *bound => Ok(()),
                Some(n) => Err(format!("value {} is not greater than {}", n, bound)),
                None => Err("value is null or not numeric".to_string()),
            },
            Rule::LessThan(bound) => match present.and_then(FieldValue::as_f64) {
                Some(n) if n < *bound => Ok(()),
                Some(n) => Err(format!("value {} is not less than {}", n, bound)),
                None => Err("value is null or not numeric".to_string()),
            },
            Rule::MaxLength(max) => match present.and_then(FieldValue::text_len) {
                Some(len) if len <= *max => Ok(()),
                Some(len) => Err(format!("length {} exceeds maximum {}", len, max)),
                None => Err("value is null or not text".to_string()),
            },
            Rule::MinLength(min) => match present.and_then(FieldValue::text_len) {
                Some(len) if len >= *min => Ok(()),
                Some(len) => Err(format!("length {} is below minimum {}", len, min)),
                None => Err("value is null or not text".to_string()),
            },
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::NotNull => write!(f, "not_null"),
            Rule::Equals(l) => write!(f, "equals({})", l),
            Rule::NotEquals(l) => write!(f, "not_equals({})", l),
            Rule::GreaterThan(n) => write!(f, "greater_than({})", n),
            Rule::LessThan(n) => write!(f, "less_than({})", n),
            Rule::MaxLength(n) => write!(f, "max_length({})", n),
            Rule::MinLength(n) => write!(f, "min_length({})", n),
        }
    }
}

/// The ordered rules declared for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRules {
    pub field: String,
    /// Parameterized rules are written as single-key maps
    /// (`- { greater_than: 0 }`), not YAML tags, hence the singleton-map
    /// representation.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub checks: Vec<Rule>,
}

/// Field-to-rules mapping for one source. Declaration order is the order
/// violations are reported in.
pub type RuleSet = Vec<FieldRules>;
