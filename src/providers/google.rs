//! Google Gemini adapter (`generateContent`).

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::LlmError;
use crate::schema::ResponseSchema;
use crate::structured::{create_json_prompt, extract_json, parse_and_validate, ExtractionConfig};
use crate::types::{Model, ProviderKind, RequestOptions};

use super::{LlmProvider, ProviderCore};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    candidate_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

pub struct GoogleProvider {
    core: ProviderCore,
    extraction: ExtractionConfig,
}

impl GoogleProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            core: ProviderCore::new(ProviderKind::Google, api_key, DEFAULT_BASE_URL)?,
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

    async fn generate_call(
        &self,
        model: &Model,
        prompt: &str,
        options: &RequestOptions,
    ) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                candidate_count: 1,
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
            },
        };
        let body = serde_json::to_value(&request).map_err(|e| {
            LlmError::ConfigurationError(format!("request serialization failed: {e}"))
        })?;

        // Some catalog entries carry a "models/" prefix already.
        let model_path = model.full_name.trim_start_matches("models/");
        let url = format!(
            "{}/models/{}:generateContent",
            self.core.base_url(),
            model_path
        );
        let builder = self
            .core
            .http()
            .post(&url)
            .header("x-goog-api-key", self.core.api_key());
        let response = self.core.post_json(builder, &body).await?;

        let content = response
            .pointer("/candidates/0/content")
            .unwrap_or(&Value::Null);
        self.core.text_from_content(content)
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
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
        self.generate_call(model, prompt, options).await
    }

    async fn call_model_structured(
        &self,
        model: &Model,
        prompt: &str,
        schema: &ResponseSchema,
        options: &RequestOptions,
    ) -> Result<Value, LlmError> {
        let augmented = create_json_prompt(prompt, schema);
        let text = self.generate_call(model, &augmented, options).await?;
        let candidate = extract_json(&text, &self.extraction);
        parse_and_validate(&candidate, schema, ProviderKind::Google, &text)
    }
}
