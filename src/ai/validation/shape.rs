//! Response Shape Validation
//!
//! Checks a parsed JSON value against the [`SchemaDescriptor`] the caller
//! declared:
//! - kind of every node (string, number, boolean, object, array)
//! - presence of required object properties
//!
//! Extra properties are tolerated. Only active when the gateway runs with
//! `strict_schema`; otherwise parsed JSON is returned as-is.

use serde_json::Value;
use std::fmt;

use crate::ai::schema::SchemaDescriptor;

/// A single mismatch between a value and its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeIssue {
    /// JSON-pointer-like location, `$` for the root
    pub path: String,
    pub message: String,
}

impl fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate `value` against `schema`, collecting every issue
pub fn validate_shape(schema: &SchemaDescriptor, value: &Value) -> Vec<ShapeIssue> {
    let mut issues = Vec::new();
    check(schema, value, "$", &mut issues);
    issues
}

fn check(schema: &SchemaDescriptor, value: &Value, path: &str, issues: &mut Vec<ShapeIssue>) {
    match (schema, value) {
        (SchemaDescriptor::String { .. }, Value::String(_))
        | (SchemaDescriptor::Number { .. }, Value::Number(_))
        | (SchemaDescriptor::Boolean { .. }, Value::Bool(_)) => {}
        (SchemaDescriptor::Object { fields, .. }, Value::Object(map)) => {
            for field in fields {
                let child_path = format!("{}.{}", path, field.name);
                match map.get(&field.name) {
                    Some(child) => check(&field.schema, child, &child_path, issues),
                    None if field.required => issues.push(ShapeIssue {
                        path: child_path,
                        message: "missing required field".to_string(),
                    }),
                    None => {}
                }
            }
        }
        (SchemaDescriptor::Array { items, .. }, Value::Array(elements)) => {
            for (i, element) in elements.iter().enumerate() {
                check(items, element, &format!("{}[{}]", path, i), issues);
            }
        }
        (schema, value) => issues.push(ShapeIssue {
            path: path.to_string(),
            message: format!("expected {}, found {}", schema.kind(), json_kind(value)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
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

    fn suggestion() -> SchemaDescriptor {
        SchemaDescriptor::object()
            .required("mealName", SchemaDescriptor::string("Meal"))
            .required("reason", SchemaDescriptor::string("Reason"))
            .optional("score", SchemaDescriptor::number("Score"))
    }

    #[test]
    fn test_valid_object() {
        let value = json!({"mealName": "X", "reason": "Y", "extra": true});
        assert!(validate_shape(&suggestion(), &value).is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let issues = validate_shape(&suggestion(), &json!({"mealName": "X"}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "$.reason");
        assert_eq!(issues[0].message, "missing required field");
    }

    #[test]
    fn test_wrong_kind_reported_with_path() {
        let schema = SchemaDescriptor::array_of(suggestion());
        let value = json!([
            {"mealName": "X", "reason": "Y"},
            {"mealName": 5, "reason": "Y", "score": "high"}
        ]);

        let issues = validate_shape(&schema, &value);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].to_string(), "$[1].mealName: expected string, found number");
        assert_eq!(issues[1].path, "$[1].score");
    }

    #[test]
    fn test_root_kind_mismatch() {
        let issues = validate_shape(&suggestion(), &json!([]));
        assert_eq!(issues[0].message, "expected object, found array");
    }
}
