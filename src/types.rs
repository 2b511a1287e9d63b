//! Core catalog and request types shared across providers.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::error::LlmError;
use crate::providers::LlmProvider;
use crate::registry::LlmRegistry;
use crate::schema::ResponseSchema;

/// The six vendor adapter variants.
///
/// A [`Model`] is bound to exactly one variant; the registry keys its API
/// key store and provider-instance cache on this enum, never on runtime
/// type inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
    Mistral,
    Together,
    Xai,
}

impl ProviderKind {
    /// All variants, in catalog order.
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Google,
        ProviderKind::Mistral,
        ProviderKind::Together,
        ProviderKind::Xai,
    ];

    /// Lookup name used against the remote secret store.
    pub const fn secret_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai-api-key",
            ProviderKind::Anthropic => "anthropic-api-key",
            ProviderKind::Google => "google-gemini-api-key",
            ProviderKind::Mistral => "mistral-api-key",
            ProviderKind::Together => "together-api-key",
            ProviderKind::Xai => "xai-api-key",
        }
    }

    /// Short identifier used in configuration and error messages.
    pub const fn id(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::Mistral => "mistral",
            ProviderKind::Together => "together",
            ProviderKind::Xai => "xai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Organization credited as the origin of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lab {
    pub name: &'static str,
    pub logo: &'static str,
}

/// Per-call optional parameters.
///
/// Providers include `temperature`/`max_tokens` in the outgoing payload
/// only when set here; `wait_time` overrides the retry engine's default
/// 30-second backoff interval.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub wait_time: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub const fn with_wait_time(mut self, wait_time: Duration) -> Self {
        self.wait_time = Some(wait_time);
        self
    }
}

/// Catalog record binding a logical model identifier to one vendor's
/// concrete model name and provider variant.
///
/// Records are static and immutable; the catalog in
/// [`crate::registry::catalog`] is the only place they are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model {
    /// Globally unique short name, used for lookup.
    pub id: &'static str,
    /// Vendor-facing model name sent on the wire.
    pub full_name: &'static str,
    /// Context window size in tokens.
    pub token_limit: u32,
    /// Which adapter variant handles this model.
    pub provider: ProviderKind,
    pub lab: &'static Lab,
    pub org: Option<&'static str>,
    pub source: Option<&'static str>,
    /// Reasoning models get vendor-specific payload shaping (e.g. the
    /// OpenAI adapter omits `temperature` for them).
    pub reasoning_model: bool,
}

impl Model {
    /// Request a plain-text response through the registry's provider for
    /// this model.
    pub async fn get_response(
        &self,
        registry: &LlmRegistry,
        prompt: &str,
        options: &RequestOptions,
    ) -> Result<String, LlmError> {
        let provider = registry.provider(self.provider)?;
        provider.get_response(self, prompt, options).await
    }

    /// Request a schema-conformant response through the registry's
    /// provider for this model.
    pub async fn get_structured_response(
        &self,
        registry: &LlmRegistry,
        prompt: &str,
        schema: &ResponseSchema,
        options: &RequestOptions,
    ) -> Result<Value, LlmError> {
        let provider = registry.provider(self.provider)?;
        provider
            .get_structured_response(self, prompt, schema, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_ids_are_distinct() {
        let mut ids: Vec<&str> = ProviderKind::ALL.iter().map(|p| p.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ProviderKind::ALL.len());
    }

    #[test]
    fn request_options_builder_sets_fields() {
        let options = RequestOptions::new()
            .with_temperature(0.2)
            .with_max_tokens(1024)
            .with_wait_time(Duration::from_secs(5));
        assert_eq!(options.temperature, Some(0.2));
        assert_eq!(options.max_tokens, Some(1024));
        assert_eq!(options.wait_time, Some(Duration::from_secs(5)));
    }
}
