//! Shape validation for decoded network payloads.
//!
//! A [`Shape`] declares what a payload must look like: required and optional
//! fields, primitive types, nested arrays, fixed-length tuples and objects.
//! [`validate`] walks a `serde_json::Value` against a shape and reports every
//! mismatch it finds, each prefixed with the JSON path of the offending value
//! (`$` is the payload root).
//!
//! Payload fields must not be read until validation has passed; typed
//! deserialization happens afterwards.

use serde_json::{Map, Value};
use thiserror::Error;

/// Raised when a payload does not conform to its declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .reasons.join("; "))]
pub struct ValidationError {
    reasons: Vec<String>,
}

impl ValidationError {
    pub fn new(reasons: Vec<String>) -> Self {
        Self { reasons }
    }

    /// Individual mismatch descriptions, in payload order.
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

/// Declared structure of a JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Accepts any value.
    Any,
    String,
    Boolean,
    /// A JSON number, optionally bounded from below (inclusive).
    Number { minimum: Option<f64> },
    /// Homogeneous array with length bounds.
    Array {
        items: Box<Shape>,
        min_items: usize,
        max_items: Option<usize>,
    },
    /// Fixed-length array with a shape per position.
    Tuple(Vec<Shape>),
    /// Object with declared fields. Closed objects reject undeclared keys.
    Object { fields: Vec<Field>, closed: bool },
}

/// A named member of an object shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

impl Shape {
    pub fn number() -> Self {
        Shape::Number { minimum: None }
    }

    pub fn non_negative_number() -> Self {
        Shape::Number { minimum: Some(0.0) }
    }

    pub fn array(items: Shape) -> Self {
        Shape::Array {
            items: Box::new(items),
            min_items: 0,
            max_items: None,
        }
    }

    /// Open object: undeclared keys are tolerated.
    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Shape::Object {
            fields: fields.into_iter().collect(),
            closed: false,
        }
    }

    /// Require at least `min` items. No effect on non-array shapes.
    pub fn with_min_items(self, min: usize) -> Self {
        match self {
            Shape::Array {
                items, max_items, ..
            } => Shape::Array {
                items,
                min_items: min,
                max_items,
            },
            other => other,
        }
    }

    /// Reject undeclared keys. No effect on non-object shapes.
    pub fn closed(self) -> Self {
        match self {
            Shape::Object { fields, .. } => Shape::Object {
                fields,
                closed: true,
            },
            other => other,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Shape::Any => "any value",
            Shape::String => "string",
            Shape::Boolean => "boolean",
            Shape::Number { .. } => "number",
            Shape::Array { .. } | Shape::Tuple(_) => "array",
            Shape::Object { .. } => "object",
        }
    }
}

/// Validate `payload` against `shape`, collecting every mismatch.
pub fn validate(shape: &Shape, payload: &Value) -> Result<(), ValidationError> {
    let mut reasons = Vec::new();
    check(shape, payload, "$", &mut reasons);
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(reasons))
    }
}

fn check(shape: &Shape, value: &Value, path: &str, reasons: &mut Vec<String>) {
    match (shape, value) {
        (Shape::Any, _) | (Shape::String, Value::String(_)) | (Shape::Boolean, Value::Bool(_)) => {}
        (Shape::Number { minimum }, Value::Number(number)) => {
            if let (Some(minimum), Some(actual)) = (minimum, number.as_f64()) {
                if actual < *minimum {
                    reasons.push(format!("{path}: expected number >= {minimum}, found {actual}"));
                }
            }
        }
        (
            Shape::Array {
                items,
                min_items,
                max_items,
            },
            Value::Array(values),
        ) => {
            if values.len() < *min_items {
                reasons.push(format!(
                    "{path}: expected at least {min_items} items, found {}",
                    values.len()
                ));
            }
            if let Some(max_items) = max_items {
                if values.len() > *max_items {
                    reasons.push(format!(
                        "{path}: expected at most {max_items} items, found {}",
                        values.len()
                    ));
                }
            }
            for (idx, item) in values.iter().enumerate() {
                check(items, item, &format!("{path}[{idx}]"), reasons);
            }
        }
        (Shape::Tuple(positions), Value::Array(values)) => {
            if values.len() != positions.len() {
                reasons.push(format!(
                    "{path}: expected exactly {} items, found {}",
                    positions.len(),
                    values.len()
                ));
                return;
            }
            for (idx, (position, item)) in positions.iter().zip(values).enumerate() {
                check(position, item, &format!("{path}[{idx}]"), reasons);
            }
        }
        (Shape::Object { fields, closed }, Value::Object(members)) => {
            check_object(fields, *closed, members, path, reasons);
        }
        (expected, found) => {
            reasons.push(format!(
                "{path}: expected {}, found {}",
                expected.describe(),
                json_type(found)
            ));
        }
    }
}

fn check_object(
    fields: &[Field],
    closed: bool,
    members: &Map<String, Value>,
    path: &str,
    reasons: &mut Vec<String>,
) {
    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        match members.get(field.name) {
            Some(value) => check(&field.shape, value, &field_path, reasons),
            None if field.required => {
                reasons.push(format!("{field_path}: required field is missing"));
            }
            None => {}
        }
    }

    if closed {
        for key in members.keys() {
            if !fields.iter().any(|field| field.name == key) {
                reasons.push(format!("{path}.{key}: unexpected field"));
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_shape() -> Shape {
        Shape::object([Field::required("token", Shape::String)]).closed()
    }

    #[test]
    fn accepts_conforming_payload() {
        assert!(validate(&token_shape(), &json!({ "token": "abc" })).is_ok());
    }

    #[test]
    fn reports_missing_and_unexpected_fields() {
        let err = validate(&token_shape(), &json!({ "notTheToken": "asdf" })).unwrap_err();
        assert_eq!(
            err.reasons(),
            &[
                "$.token: required field is missing".to_string(),
                "$.notTheToken: unexpected field".to_string(),
            ]
        );
    }

    #[test]
    fn open_objects_tolerate_extra_fields() {
        let shape = Shape::object([Field::required("token", Shape::String)]);
        assert!(validate(&shape, &json!({ "token": "abc", "extra": 1 })).is_ok());
    }

    #[test]
    fn reports_type_mismatch_with_path() {
        let err = validate(&token_shape(), &json!({ "token": 42 })).unwrap_err();
        assert_eq!(err.to_string(), "$.token: expected string, found number");
    }

    #[test]
    fn rejects_non_object_root() {
        let err = validate(&token_shape(), &json!(["token"])).unwrap_err();
        assert_eq!(err.to_string(), "$: expected object, found array");
    }

    #[test]
    fn optional_field_is_checked_when_present() {
        let shape = Shape::object([Field::optional("status", Shape::String)]);
        assert!(validate(&shape, &json!({})).is_ok());
        let err = validate(&shape, &json!({ "status": null })).unwrap_err();
        assert!(err.to_string().contains("$.status: expected string, found null"));
    }

    #[test]
    fn nested_tuples_report_each_position() {
        let shape = Shape::array(Shape::Tuple(vec![Shape::String, Shape::String])).with_min_items(2);
        let err = validate(&shape, &json!([["1", 2], ["3"]])).unwrap_err();
        assert_eq!(
            err.reasons(),
            &[
                "$[0][1]: expected string, found number".to_string(),
                "$[1]: expected exactly 2 items, found 1".to_string(),
            ]
        );
    }

    #[test]
    fn array_length_bounds_are_enforced() {
        let shape = Shape::array(Shape::Any).with_min_items(2);
        let err = validate(&shape, &json!([1])).unwrap_err();
        assert_eq!(err.to_string(), "$: expected at least 2 items, found 1");

        let bounded = Shape::Array {
            items: Box::new(Shape::Any),
            min_items: 0,
            max_items: Some(1),
        };
        assert!(validate(&bounded, &json!([1, 2])).is_err());
    }

    #[test]
    fn number_minimum_is_inclusive() {
        let shape = Shape::non_negative_number();
        assert!(validate(&shape, &json!(0)).is_ok());
        assert!(validate(&shape, &json!(12.5)).is_ok());
        let err = validate(&shape, &json!(-1)).unwrap_err();
        assert_eq!(err.to_string(), "$: expected number >= 0, found -1");
    }
}
