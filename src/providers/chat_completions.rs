//! Shared OpenAI-style chat-completions wire shape.
//!
//! Mistral, Together and xAI all speak this dialect; the adapters differ
//! only in endpoint and credentials. Optional parameters are serialized
//! only when the caller supplied them.

use serde::Serialize;
use serde_json::Value;

use crate::error::LlmError;
use crate::types::{Model, RequestOptions};

use super::ProviderCore;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Issue a single-user-message chat completion and return the raw
/// `choices[0].message.content` value for the adapter to flatten.
pub(super) async fn complete(
    core: &ProviderCore,
    model: &Model,
    prompt: &str,
    options: &RequestOptions,
) -> Result<Value, LlmError> {
    let request = ChatCompletionRequest {
        model: model.full_name,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: options.temperature,
        max_tokens: options.max_tokens,
    };
    let body = serde_json::to_value(&request)
        .map_err(|e| LlmError::ConfigurationError(format!("request serialization failed: {e}")))?;

    let url = format!("{}/chat/completions", core.base_url());
    let builder = core.http().post(&url).bearer_auth(core.api_key());
    let mut response = core.post_json(builder, &body).await?;

    // Detach the content value; a missing path is treated as null and the
    // adapter's flattening will reject it.
    Ok(response
        .pointer_mut("/choices/0/message/content")
        .map(Value::take)
        .unwrap_or(Value::Null))
}
