//! Code Fence Stripping
//!
//! The upstream sometimes wraps JSON output in a Markdown fence even when
//! asked for `application/json`. Before parsing, the gateway unwraps:
//!
//! 1. the first ```` ```json ```` block anywhere in the text (inner
//!    whitespace trimmed), or
//! 2. an unlabelled fence that wraps the whole response.
//!
//! Nothing else is repaired: text that still isn't JSON is a parse failure.

use serde_json::Value;
use tracing::debug;

use crate::constants::preview::MAX_BODY_PREVIEW_CHARS;
use crate::types::LlmError;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Strip a Markdown code fence, returning the text to parse.
///
/// Returns the input unchanged when no fence applies or the fenced block is
/// empty.
pub fn strip_code_fences(raw: &str) -> &str {
    if let Some(inner) = labelled_json_block(raw) {
        return inner;
    }

    if let Some(inner) = whole_response_fence(raw) {
        return inner;
    }

    raw
}

/// Strip fences and parse as JSON
pub fn parse_completion_json(raw: &str) -> Result<Value, LlmError> {
    let candidate = strip_code_fences(raw);
    if candidate.len() != raw.len() {
        debug!("Stripped code fence from JSON response");
    }

    serde_json::from_str::<Value>(candidate).map_err(|e| {
        LlmError::parse(format!(
            "response is not valid JSON ({}). Content preview: {}",
            e,
            preview(candidate)
        ))
    })
}

/// First ```json ... ``` block anywhere in the text
fn labelled_json_block(raw: &str) -> Option<&str> {
    let start = raw.find(JSON_FENCE)? + JSON_FENCE.len();
    let rest = &raw[start..];
    let body = rest.trim_start();
    let end = body.find(FENCE)?;
    let inner = body[..end].trim_end();

    (!inner.is_empty()).then_some(inner)
}

/// ``` on the first line and ``` at the very end, any language tag
fn whole_response_fence(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE) || trimmed.len() < 2 * FENCE.len() || !trimmed.ends_with(FENCE)
    {
        return None;
    }

    let first_newline = trimmed.find('\n')?;
    let closing = trimmed.len() - FENCE.len();
    if first_newline >= closing {
        return None;
    }

    let inner = trimmed[first_newline + 1..closing].trim();
    (!inner.is_empty()).then_some(inner)
}

fn preview(s: &str) -> String {
    s.chars().take(MAX_BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_plain_json_untouched() {
        let input = r#"{"key": "value"}"#;
        assert_eq!(strip_code_fences(input), input);
    }

    #[test]
    fn test_strip_labelled_fence() {
        let input = "```json\n{\"mealName\":\"X\",\"reason\":\"Y\"}\n```";
        let value = parse_completion_json(input).unwrap();
        assert_eq!(value, json!({"mealName": "X", "reason": "Y"}));
    }

    #[test]
    fn test_labelled_fence_inside_prose() {
        let input = "Here you go:\n```json\n[1, 2, 3]\n```\nEnjoy!";
        assert_eq!(strip_code_fences(input), "[1, 2, 3]");
    }

    #[test]
    fn test_first_labelled_block_wins() {
        let input = "```json\n{\"a\":1}\n```\n```json\n{\"b\":2}\n```";
        assert_eq!(parse_completion_json(input).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_unlabelled_wrapping_fence() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(parse_completion_json(input).unwrap()["key"], "value");
    }

    #[test]
    fn test_empty_fence_left_alone() {
        let input = "```json\n```";
        assert_eq!(strip_code_fences(input), input);
        assert!(parse_completion_json(input).is_err());
    }

    #[test]
    fn test_garbage_is_parse_failure() {
        let err = parse_completion_json("Sorry, I can't help with that.").unwrap_err();
        assert!(err.is_parse_failure());
        assert!(err.message.contains("Sorry"));
    }

    #[test]
    fn test_unclosed_fence_is_parse_failure() {
        let err = parse_completion_json("```json\n{\"a\": 1}").unwrap_err();
        assert!(err.is_parse_failure());
    }

    fn json_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 ,.!?'\\-]{0,24}".prop_map(Value::String),
        ]
    }

    fn json_value() -> impl Strategy<Value = Value> {
        json_leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_fenced_and_bare_parse_identically(value in json_value(), pretty in any::<bool>()) {
            let body = if pretty {
                serde_json::to_string_pretty(&value).unwrap()
            } else {
                serde_json::to_string(&value).unwrap()
            };
            let fenced = format!("```json\n{}\n```", body);

            let bare = parse_completion_json(&body).unwrap();
            let unwrapped = parse_completion_json(&fenced).unwrap();
            prop_assert_eq!(&bare, &value);
            prop_assert_eq!(unwrapped, bare);
        }
    }
}
