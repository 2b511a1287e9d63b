//! Anthropic adapter (Messages API).
//!
//! The Messages API requires an explicit `max_tokens` bound on every
//! request; a caller omitting it has violated the programming contract
//! and fails immediately, before any request is issued.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::LlmError;
use crate::schema::ResponseSchema;
use crate::structured::{create_json_prompt, extract_json, parse_and_validate, ExtractionConfig};
use crate::types::{Model, ProviderKind, RequestOptions};

use super::{LlmProvider, ProviderCore};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: Vec<MessagesMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

pub struct AnthropicProvider {
    core: ProviderCore,
    extraction: ExtractionConfig,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            core: ProviderCore::new(ProviderKind::Anthropic, api_key, DEFAULT_BASE_URL)?,
            extraction: ExtractionConfig::default(),
        })
    }

    /// Point the adapter at a different endpoint (mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.core.set_base_url(base_url);
        self
    }

    /// Override the JSON-extraction heuristics used by structured calls.
    pub fn with_extraction_config(mut self, config: ExtractionConfig) -> Self {
        self.extraction = config;
        self
    }

    /// Override the degenerate-output marker checked by the retry engine.
    pub fn with_degenerate_marker(mut self, marker: impl Into<String>) -> Self {
        self.core.set_degenerate_marker(marker);
        self
    }

    async fn messages_call(
        &self,
        model: &Model,
        prompt: &str,
        options: &RequestOptions,
    ) -> Result<String, LlmError> {
        let max_tokens = options.max_tokens.ok_or(LlmError::MissingParameter {
            provider: ProviderKind::Anthropic,
            parameter: "max_tokens",
        })?;
        let request = MessagesRequest {
            model: model.full_name,
            messages: vec![MessagesMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: options.temperature,
        };
        let body = serde_json::to_value(&request).map_err(|e| {
            LlmError::ConfigurationError(format!("request serialization failed: {e}"))
        })?;

        let url = format!("{}/messages", self.core.base_url());
        let builder = self
            .core
            .http()
            .post(&url)
            .header("x-api-key", self.core.api_key())
            .header("anthropic-version", ANTHROPIC_VERSION);
        let response = self.core.post_json(builder, &body).await?;

        self.core
            .text_from_content(response.get("content").unwrap_or(&Value::Null))
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn core(&self) -> &ProviderCore {
        &self.core
    }

    async fn call_model(
        &self,
        model: &Model,
        prompt: &str,
        options: &RequestOptions,
    ) -> Result<String, LlmError> {
        self.messages_call(model, prompt, options).await
    }

    async fn call_model_structured(
        &self,
        model: &Model,
        prompt: &str,
        schema: &ResponseSchema,
        options: &RequestOptions,
    ) -> Result<Value, LlmError> {
        let augmented = create_json_prompt(prompt, schema);
        let text = self.messages_call(model, &augmented, options).await?;
        let candidate = extract_json(&text, &self.extraction);
        parse_and_validate(&candidate, schema, ProviderKind::Anthropic, &text)
    }
}
