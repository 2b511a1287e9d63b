//! OpenAI adapter (Responses API).
//!
//! Reasoning models reject `temperature`, so it is omitted from the
//! payload for them even when the caller supplied one. Success is judged
//! by the vendor-reported `status` field: anything other than
//! `"completed"` is a permanent failure carrying the status and any
//! incomplete-reason detail — never retried, never swallowed.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::LlmError;
use crate::schema::ResponseSchema;
use crate::structured::{create_json_prompt, extract_json, parse_and_validate, ExtractionConfig};
use crate::types::{Model, ProviderKind, RequestOptions};

use super::{LlmProvider, ProviderCore};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

pub struct OpenAiProvider {
    core: ProviderCore,
    extraction: ExtractionConfig,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            core: ProviderCore::new(ProviderKind::OpenAi, api_key, DEFAULT_BASE_URL)?,
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

    async fn responses_call(
        &self,
        model: &Model,
        input: &str,
        options: &RequestOptions,
    ) -> Result<String, LlmError> {
        // Reasoning models do not accept temperature.
        let temperature = if model.reasoning_model {
            None
        } else {
            options.temperature
        };
        let request = ResponsesRequest {
            model: model.full_name,
            input,
            temperature,
            max_output_tokens: options.max_tokens,
        };
        let body = serde_json::to_value(&request).map_err(|e| {
            LlmError::ConfigurationError(format!("request serialization failed: {e}"))
        })?;

        let url = format!("{}/responses", self.core.base_url());
        let builder = self.core.http().post(&url).bearer_auth(self.core.api_key());
        let response = self.core.post_json(builder, &body).await?;

        let status = response
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        if status != "completed" {
            let reason = response
                .get("incomplete_details")
                .filter(|v| !v.is_null())
                .map(Value::to_string);
            return Err(LlmError::IncompleteResponse {
                provider: ProviderKind::OpenAi,
                status: status.to_string(),
                reason,
            });
        }

        self.core
            .text_from_content(response.get("output").unwrap_or(&Value::Null))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
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
        self.responses_call(model, prompt, options).await
    }

    async fn call_model_structured(
        &self,
        model: &Model,
        prompt: &str,
        schema: &ResponseSchema,
        options: &RequestOptions,
    ) -> Result<Value, LlmError> {
        let augmented = create_json_prompt(prompt, schema);
        let text = self.responses_call(model, &augmented, options).await?;
        let candidate = extract_json(&text, &self.extraction);
        parse_and_validate(&candidate, schema, ProviderKind::OpenAi, &text)
    }
}
