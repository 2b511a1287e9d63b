//! Flattening of heterogeneous vendor content payloads.
//!
//! Vendors disagree on what a message "content" value is: a plain string,
//! an ordered array of mixed string/object fragments, an object exposing a
//! `text` field, or a reasoning wrapper nesting the text under `thinking`.
//! [`flatten_content`] unwraps all of these recursively, concatenating only
//! the textual leaves and silently dropping structural wrappers.

use serde_json::Value;

/// Object keys that act as structural wrappers around nested content.
const WRAPPER_KEYS: [&str; 5] = ["thinking", "content", "message", "output", "parts"];

/// Flatten a vendor content value into plain text.
///
/// Returns `None` for JSON `null` (an absent completion); callers treat
/// `None` and whitespace-only results as permanent empty-content failures.
pub fn flatten_content(content: &Value) -> Option<String> {
    match content {
        Value::Null => None,
        other => {
            let mut out = String::new();
            collect_text(other, &mut out);
            Some(out)
        }
    }
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        Value::Object(map) => {
            // A "text" field is the payload; anything else is a wrapper.
            if let Some(text) = map.get("text") {
                collect_text(text, out);
                return;
            }
            for key in WRAPPER_KEYS {
                if let Some(nested) = map.get(key) {
                    collect_text(nested, out);
                    return;
                }
            }
        }
        // Bare numbers/booleans are structural noise, not text.
        Value::Number(_) | Value::Bool(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(flatten_content(&json!("hello")).unwrap(), "hello");
    }

    #[test]
    fn nested_sequences_concatenate_in_order() {
        let content = json!([["Hello, "], "world"]);
        assert_eq!(flatten_content(&content).unwrap(), "Hello, world");
    }

    #[test]
    fn text_fragments_unwrap() {
        let content = json!([
            {"type": "text", "text": "part one"},
            {"type": "text", "text": " and two"},
        ]);
        assert_eq!(flatten_content(&content).unwrap(), "part one and two");
    }

    #[test]
    fn thinking_wrapper_unwraps_to_text_leaf() {
        let content = json!({"thinking": {"text": "the answer"}});
        assert_eq!(flatten_content(&content).unwrap(), "the answer");
    }

    #[test]
    fn null_is_absent() {
        assert!(flatten_content(&Value::Null).is_none());
    }

    #[test]
    fn structural_wrapper_without_text_contributes_nothing() {
        let content = json!([{"type": "tool_use", "id": "t1"}, "tail"]);
        assert_eq!(flatten_content(&content).unwrap(), "tail");
    }
}
