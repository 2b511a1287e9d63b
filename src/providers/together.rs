//! Together adapter (chat completions).
//!
//! Together has been observed returning `null` message content and
//! content that flattens to an empty string; both are permanent failures
//! rather than retry fodder.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LlmError;
use crate::schema::ResponseSchema;
use crate::structured::{create_json_prompt, extract_json, parse_and_validate, ExtractionConfig};
use crate::types::{Model, ProviderKind, RequestOptions};

use super::chat_completions;
use super::{LlmProvider, ProviderCore};

const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";

pub struct TogetherProvider {
    core: ProviderCore,
    extraction: ExtractionConfig,
}

impl TogetherProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            core: ProviderCore::new(ProviderKind::Together, api_key, DEFAULT_BASE_URL)?,
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
}

#[async_trait]
impl LlmProvider for TogetherProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Together
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
        let content = chat_completions::complete(&self.core, model, prompt, options).await?;
        self.core.text_from_content(&content)
    }

    async fn call_model_structured(
        &self,
        model: &Model,
        prompt: &str,
        schema: &ResponseSchema,
        options: &RequestOptions,
    ) -> Result<Value, LlmError> {
        let augmented = create_json_prompt(prompt, schema);
        let content =
            chat_completions::complete(&self.core, model, &augmented, options).await?;
        let text = self.core.text_from_content(&content)?;
        let candidate = extract_json(&text, &self.extraction);
        parse_and_validate(&candidate, schema, ProviderKind::Together, &text)
    }
}
