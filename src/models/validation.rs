//! Record validation
//!
//! Field-level violations collected while constructing or re-checking a
//! character record. Every violation carries the path of the offending
//! field, e.g. `ability_scores.wisdom` or `inventory[2].quantity`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// A single violated constraint
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldViolation {
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    #[error("Field '{field}' must be {expected}")]
    WrongType { field: String, expected: String },

    #[error("Field '{field}' is below minimum value: min={min}, got={got}")]
    BelowMin { field: String, min: i128, got: i128 },

    #[error("Field '{field}' exceeds maximum value: max={max}, got={got}")]
    ExceedsMax { field: String, max: i128, got: i128 },

    #[error("Field '{field}' must not be empty")]
    Empty { field: String },
}

impl FieldViolation {
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } => field.as_str(),
            Self::WrongType { field, .. } => field.as_str(),
            Self::BelowMin { field, .. } => field.as_str(),
            Self::ExceedsMax { field, .. } => field.as_str(),
            Self::Empty { field } => field.as_str(),
        }
    }
}

/// All violations found in one record, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Returns true if any violation points at `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field() == field)
    }

    /// `Ok(value)` when nothing was recorded
    pub fn into_result<T>(self, value: T) -> ValidationResult<T> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<FieldViolation> for ValidationErrors {
    fn from(violation: FieldViolation) -> Self {
        Self(vec![violation])
    }
}

pub type ValidationResult<T> = std::result::Result<T, ValidationErrors>;

/// Re-checks invariants of an already constructed value
pub trait Validatable {
    fn validate(&self) -> ValidationResult<()>;
}

/// Joins a parent path and a child field name
pub(crate) fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Checks that an integer lies in `[min, max]`; `max` is optional
pub(crate) fn check_range(
    errors: &mut ValidationErrors,
    field: &str,
    value: i128,
    min: i128,
    max: Option<i128>,
) {
    if value < min {
        errors.push(FieldViolation::BelowMin {
            field: field.to_string(),
            min,
            got: value,
        });
    } else if let Some(max) = max {
        if value > max {
            errors.push(FieldViolation::ExceedsMax {
                field: field.to_string(),
                max,
                got: value,
            });
        }
    }
}

/// Reads fields out of a JSON object, recording every problem instead of
/// stopping at the first one.
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> FieldReader<'a> {
    /// Fails with a single `WrongType` when `value` is not an object
    pub(crate) fn new(value: &'a Value, prefix: &str) -> Result<Self, FieldViolation> {
        match value.as_object() {
            Some(object) => Ok(Self {
                object,
                prefix: prefix.to_string(),
            }),
            None => Err(FieldViolation::WrongType {
                field: if prefix.is_empty() {
                    "body".to_string()
                } else {
                    prefix.to_string()
                },
                expected: "an object".to_string(),
            }),
        }
    }

    pub(crate) fn path(&self, field: &str) -> String {
        field_path(&self.prefix, field)
    }

    /// Raw access; `None` for absent fields and explicit nulls
    pub(crate) fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|v| !v.is_null())
    }

    fn required(&self, errors: &mut ValidationErrors, field: &str) -> Option<&'a Value> {
        let value = self.get(field);
        if value.is_none() {
            errors.push(FieldViolation::MissingField {
                field: self.path(field),
            });
        }
        value
    }

    pub(crate) fn string(&self, errors: &mut ValidationErrors, field: &str) -> Option<String> {
        let value = self.required(errors, field)?;
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                errors.push(FieldViolation::WrongType {
                    field: self.path(field),
                    expected: "a string".to_string(),
                });
                None
            }
        }
    }

    pub(crate) fn optional_string(
        &self,
        errors: &mut ValidationErrors,
        field: &str,
    ) -> Option<String> {
        let value = self.get(field)?;
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                errors.push(FieldViolation::WrongType {
                    field: self.path(field),
                    expected: "a string".to_string(),
                });
                None
            }
        }
    }

    /// Reads an integer and checks it against `[min, max]`. Returns the
    /// value only when it is in range.
    pub(crate) fn integer(
        &self,
        errors: &mut ValidationErrors,
        field: &str,
        min: i128,
        max: Option<i128>,
    ) -> Option<i128> {
        let value = self.required(errors, field)?;
        let path = self.path(field);
        let Some(n) = as_whole_number(value) else {
            errors.push(FieldViolation::WrongType {
                field: path,
                expected: "an integer".to_string(),
            });
            return None;
        };
        let before = errors.len();
        check_range(errors, &path, n, min, max);
        (errors.len() == before).then_some(n)
    }
}

/// Integers of any width, and floats with no fractional part such as `2.0`
fn as_whole_number(value: &Value) -> Option<i128> {
    if let Some(n) = value.as_i64() {
        return Some(i128::from(n));
    }
    if let Some(n) = value.as_u64() {
        return Some(i128::from(n));
    }
    let f = value.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 1e38).then_some(f as i128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_path_nesting() {
        assert_eq!(field_path("", "level"), "level");
        assert_eq!(field_path("ability_scores", "wisdom"), "ability_scores.wisdom");
    }

    #[test]
    fn test_reader_collects_every_problem() {
        let value = json!({"name": 5, "level": 0});
        let reader = FieldReader::new(&value, "").unwrap();
        let mut errors = ValidationErrors::new();

        assert!(reader.string(&mut errors, "name").is_none());
        assert!(reader.integer(&mut errors, "level", 1, Some(20)).is_none());
        assert!(reader.string(&mut errors, "race").is_none());

        assert_eq!(errors.len(), 3);
        assert!(matches!(
            errors.violations()[0],
            FieldViolation::WrongType { .. }
        ));
        assert!(matches!(
            errors.violations()[1],
            FieldViolation::BelowMin { min: 1, got: 0, .. }
        ));
        assert!(matches!(
            errors.violations()[2],
            FieldViolation::MissingField { .. }
        ));
    }

    #[test]
    fn test_reader_treats_null_as_missing() {
        let value = json!({"race": null});
        let reader = FieldReader::new(&value, "").unwrap();
        let mut errors = ValidationErrors::new();

        assert!(reader.string(&mut errors, "race").is_none());
        assert!(reader.optional_string(&mut errors, "description").is_none());
        assert_eq!(
            errors.violations(),
            &[FieldViolation::MissingField {
                field: "race".to_string()
            }]
        );
    }

    #[test]
    fn test_reader_rejects_fractional_numbers() {
        let value = json!({"a": 1.5, "b": "3"});
        let reader = FieldReader::new(&value, "x").unwrap();
        let mut errors = ValidationErrors::new();

        assert!(reader.integer(&mut errors, "a", 0, None).is_none());
        assert!(reader.integer(&mut errors, "b", 0, None).is_none());
        assert!(errors.has_field("x.a"));
        assert!(matches!(
            errors.violations()[1],
            FieldViolation::WrongType { .. }
        ));
    }

    #[test]
    fn test_reader_accepts_whole_floats() {
        let value = json!({"level": 2.0, "hp": 40.0});
        let reader = FieldReader::new(&value, "").unwrap();
        let mut errors = ValidationErrors::new();

        assert_eq!(reader.integer(&mut errors, "level", 1, Some(20)), Some(2));
        assert_eq!(reader.integer(&mut errors, "hp", 1, None), Some(40));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_huge_integers_report_their_real_value() {
        let value = json!({"a": u64::MAX, "b": 1e20});
        let reader = FieldReader::new(&value, "").unwrap();
        let mut errors = ValidationErrors::new();

        assert!(reader.integer(&mut errors, "a", 0, Some(10)).is_none());
        assert!(reader.integer(&mut errors, "b", 0, Some(i128::from(u64::MAX))).is_none());
        assert_eq!(
            errors.violations(),
            &[
                FieldViolation::ExceedsMax {
                    field: "a".to_string(),
                    max: 10,
                    got: i128::from(u64::MAX),
                },
                FieldViolation::ExceedsMax {
                    field: "b".to_string(),
                    max: i128::from(u64::MAX),
                    got: 100_000_000_000_000_000_000,
                },
            ]
        );
    }

    #[test]
    fn test_non_object_is_wrong_type() {
        let value = json!([1, 2, 3]);
        let err = FieldReader::new(&value, "").err().unwrap();
        assert_eq!(err.field(), "body");
    }

    #[test]
    fn test_display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldViolation::MissingField {
            field: "race".to_string(),
        });
        errors.push(FieldViolation::Empty {
            field: "inventory[0].name".to_string(),
        });
        assert_eq!(
            errors.to_string(),
            "Required field 'race' is missing; Field 'inventory[0].name' must not be empty"
        );
    }
}
