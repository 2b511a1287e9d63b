//! Structured-output recovery pipeline.
//!
//! None of the supported vendors is trusted to emit schema-constrained
//! JSON natively, so structured calls go through two stages: the prompt is
//! augmented with the schema and a JSON-only instruction
//! ([`create_json_prompt`]), and the raw response text is cut down to a
//! syntactically bounded JSON candidate ([`extract_json`]) before parsing
//! and validation ([`parse_and_validate`]).
//!
//! Extraction is a best-effort heuristic over observed model behavior:
//! reasoning tags, leading free text, markdown fences and trailing
//! commentary are all stripped. It must never silently corrupt data; when
//! the candidate does not parse or validate, the failure is permanent and
//! carries a truncated excerpt of the original response.

use serde_json::Value;

use crate::error::{excerpt, LlmError};
use crate::schema::ResponseSchema;
use crate::types::ProviderKind;

/// Delimiter pairs stripped from responses before JSON extraction.
///
/// The default covers the `<think>` markup emitted by reasoning models.
/// Configurable rather than hard-coded: the pair list is a fragile
/// text-pattern match inherited from observed vendor output.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub reasoning_tags: Vec<(String, String)>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            reasoning_tags: vec![("<think>".to_string(), "</think>".to_string())],
        }
    }
}

/// Append the JSON-only instruction and the schema to a prompt.
pub fn create_json_prompt(prompt: &str, schema: &ResponseSchema) -> String {
    let rendered = serde_json::to_string_pretty(schema.as_json())
        .unwrap_or_else(|_| schema.as_json().to_string());
    format!(
        "{prompt}\n\n\
         Please respond with a valid JSON object matching this schema: {rendered}\n\
         Respond with only the JSON object, no additional text."
    )
}

/// Cut free-form model output down to a JSON candidate.
///
/// Steps, in order: strip paired reasoning markup; if the remainder does
/// not start with `{`/`[`, truncate to the last opener (the answer is
/// emitted last); take the interior of the first fenced code block
/// (preferring a `json`-tagged one); strip stray trailing fences; bound
/// the candidate with independent brace/bracket depth counters.
pub fn extract_json(text: &str, config: &ExtractionConfig) -> String {
    let mut json_text = text.trim().to_string();

    // Reasoning markup: discard everything up to and including the close tag.
    for (open_tag, close_tag) in &config.reasoning_tags {
        if json_text.contains(open_tag.as_str()) {
            if let Some(end) = json_text.find(close_tag.as_str()) {
                json_text = json_text[end + close_tag.len()..].trim().to_string();
                break;
            }
        }
    }

    // Leading free-text reasoning: keep from the last opener onward.
    if !(json_text.starts_with('{') || json_text.starts_with('[')) {
        let last_brace = json_text.rfind('{');
        let last_bracket = json_text.rfind('[');
        if let Some(start) = match (last_brace, last_bracket) {
            (Some(b), Some(k)) => Some(b.max(k)),
            (Some(b), None) => Some(b),
            (None, Some(k)) => Some(k),
            (None, None) => None,
        } {
            json_text = json_text[start..].trim().to_string();
        }
    }

    // Fenced code blocks: take the interior of the first block.
    if let Some(start) = json_text.find("```json") {
        let body_start = start + "```json".len();
        if let Some(end) = json_text[body_start..].find("```") {
            json_text = json_text[body_start..body_start + end].trim().to_string();
        }
    } else if let Some(start) = json_text.find("```") {
        let body_start = start + "```".len();
        if let Some(end) = json_text[body_start..].find("```") {
            json_text = json_text[body_start..body_start + end].trim().to_string();
        }
    }

    // Stray trailing fences left by malformed output.
    json_text = json_text.trim_end_matches('`').trim().to_string();
    while json_text.ends_with("```") {
        json_text.truncate(json_text.len() - 3);
        json_text = json_text.trim_end().to_string();
    }

    // Bound the candidate: scan from the first opener until both depth
    // counters return to zero, dropping trailing commentary.
    let json_start = json_text
        .char_indices()
        .find(|&(_, c)| c == '{' || c == '[')
        .map(|(i, _)| i);
    if let Some(start) = json_start {
        let bounded = &json_text[start..];
        let mut brace_depth = 0i32;
        let mut bracket_depth = 0i32;
        let mut end = None;
        for (i, c) in bounded.char_indices() {
            match c {
                '{' => brace_depth += 1,
                '}' => {
                    brace_depth -= 1;
                    if brace_depth == 0 && bracket_depth == 0 {
                        end = Some(i + 1);
                        break;
                    }
                }
                '[' => bracket_depth += 1,
                ']' => {
                    bracket_depth -= 1;
                    if brace_depth == 0 && bracket_depth == 0 {
                        end = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }
        json_text = match end {
            Some(end) => bounded[..end].trim().to_string(),
            None => bounded.to_string(),
        };
    }

    json_text
}

/// Parse an extracted candidate and validate it against the target schema.
///
/// Both failure modes are permanent: the vendor call itself succeeded, so
/// retrying cannot fix a malformed payload.
pub fn parse_and_validate(
    json_text: &str,
    schema: &ResponseSchema,
    provider: ProviderKind,
    response_text: &str,
) -> Result<Value, LlmError> {
    let source = if response_text.is_empty() {
        json_text
    } else {
        response_text
    };
    let data: Value = serde_json::from_str(json_text).map_err(|e| LlmError::JsonParse {
        provider,
        message: e.to_string(),
        excerpt: excerpt(source),
    })?;

    schema
        .validate(&data)
        .map_err(|message| LlmError::SchemaValidation {
            provider,
            message,
            data: data.clone(),
            excerpt: excerpt(source),
        })?;

    Ok(data)
}
