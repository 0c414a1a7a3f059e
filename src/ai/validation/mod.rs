//! AI Response Validation
//!
//! Turns raw completion text into a JSON value the caller can use:
//! - Markdown fence stripping before parsing
//! - Optional shape checking against the declared schema
//!
//! Both failure modes surface as parse failures of the current attempt,
//! which the gateway retries.

mod fence;
mod shape;

pub use fence::{parse_completion_json, strip_code_fences};
pub use shape::{ShapeIssue, validate_shape};

use serde_json::Value;

use crate::ai::schema::SchemaDescriptor;
use crate::types::LlmError;

/// Parse a completion and, when `strict`, check it against `schema`
pub fn process_json_response(
    raw: &str,
    schema: &SchemaDescriptor,
    strict: bool,
) -> Result<Value, LlmError> {
    let value = parse_completion_json(raw)?;

    if strict {
        let issues = validate_shape(schema, &value);
        if !issues.is_empty() {
            let summary: Vec<String> = issues.iter().map(ToString::to_string).collect();
            return Err(LlmError::parse(format!(
                "response does not match schema: {}",
                summary.join("; ")
            )));
        }
    }

    Ok(value)
}
