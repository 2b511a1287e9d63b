//! Provider adapters and the capability contract they implement.
//!
//! Each vendor adapter implements two hooks, [`LlmProvider::call_model`]
//! and [`LlmProvider::call_model_structured`]; the provided
//! `get_response`/`get_structured_response` methods funnel both through
//! the retry engine. Adapters share [`ProviderCore`] for the HTTP client,
//! key handling and retry wiring, mirroring how request shaping stays
//! per-vendor while transport concerns stay common.

pub mod anthropic;
mod chat_completions;
pub mod google;
pub mod mistral;
pub mod openai;
pub mod together;
pub mod xai;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::content::flatten_content;
use crate::error::LlmError;
use crate::retry::{RetryEngine, DEFAULT_WAIT_TIME, REFORMAT_SENTINEL};
use crate::schema::ResponseSchema;
use crate::types::{Model, ProviderKind, RequestOptions};

pub use anthropic::AnthropicProvider;
pub use google::GoogleProvider;
pub use mistral::MistralProvider;
pub use openai::OpenAiProvider;
pub use together::TogetherProvider;
pub use xai::XaiProvider;

/// Shared adapter state: API key, HTTP client, retry engine, endpoint.
pub struct ProviderCore {
    kind: ProviderKind,
    api_key: SecretString,
    http: reqwest::Client,
    retry: RetryEngine,
    base_url: String,
}

impl ProviderCore {
    /// Build the core for one adapter. An absent or empty API key is an
    /// immediate construction failure, never deferred to the first call.
    pub fn new(
        kind: ProviderKind,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey(kind));
        }
        Ok(Self {
            kind,
            api_key: SecretString::from(api_key),
            http: reqwest::Client::new(),
            retry: RetryEngine::new().with_provider(kind),
            base_url: base_url.into(),
        })
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub(crate) fn set_degenerate_marker(&mut self, marker: impl Into<String>) {
        self.retry = self.retry.clone().with_degenerate_marker(marker);
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Issue a POST with a JSON body and decode the JSON reply.
    ///
    /// Non-success statuses become [`LlmError::ApiError`] carrying the
    /// body text; transport failures become [`LlmError::HttpError`].
    /// Both are transient by classification.
    pub(crate) async fn post_json(
        &self,
        builder: reqwest::RequestBuilder,
        body: &Value,
    ) -> Result<Value, LlmError> {
        let response = builder.json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::ApiError {
                provider: self.kind,
                status: status.as_u16(),
                message: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| {
            LlmError::HttpError(format!("invalid JSON in {} response body: {e}", self.kind))
        })
    }

    /// Flatten a vendor content value, rejecting null and empty results.
    pub(crate) fn text_from_content(&self, content: &Value) -> Result<String, LlmError> {
        let text = flatten_content(content).ok_or_else(|| LlmError::EmptyContent {
            provider: self.kind,
            detail: "message content was null".to_string(),
        })?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(LlmError::EmptyContent {
                provider: self.kind,
                detail: "message content flattened to an empty string".to_string(),
            });
        }
        Ok(trimmed.to_string())
    }
}

/// Capability contract implemented by every vendor adapter.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn core(&self) -> &ProviderCore;

    /// Log line used when a transient failure sends a call into backoff.
    fn retry_context(&self) -> String {
        format!("{} API request failed", self.kind())
    }

    /// Execute one plain-text request against the vendor.
    async fn call_model(
        &self,
        model: &Model,
        prompt: &str,
        options: &RequestOptions,
    ) -> Result<String, LlmError>;

    /// Execute one structured request: augment the prompt with the
    /// schema, issue the same vendor request shape as [`Self::call_model`],
    /// then recover and validate the JSON payload.
    async fn call_model_structured(
        &self,
        model: &Model,
        prompt: &str,
        schema: &ResponseSchema,
        options: &RequestOptions,
    ) -> Result<Value, LlmError>;

    /// Plain-text call wrapped in the retry engine.
    async fn get_response(
        &self,
        model: &Model,
        prompt: &str,
        options: &RequestOptions,
    ) -> Result<String, LlmError> {
        let wait = options.wait_time.unwrap_or(DEFAULT_WAIT_TIME);
        self.core()
            .retry
            .run(
                &self.retry_context(),
                wait,
                Some(REFORMAT_SENTINEL.to_string()),
                || self.call_model(model, prompt, options),
            )
            .await
    }

    /// Structured call wrapped in the retry engine. No text sentinel
    /// applies here, so the degenerate-output condition surfaces as a
    /// typed permanent error.
    async fn get_structured_response(
        &self,
        model: &Model,
        prompt: &str,
        schema: &ResponseSchema,
        options: &RequestOptions,
    ) -> Result<Value, LlmError> {
        let wait = options.wait_time.unwrap_or(DEFAULT_WAIT_TIME);
        self.core()
            .retry
            .run(&self.retry_context(), wait, None, || {
                self.call_model_structured(model, prompt, schema, options)
            })
            .await
    }
}
