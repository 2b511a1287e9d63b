//! Model registry: API key store and provider-instance cache.
//!
//! [`LlmRegistry`] is an explicit, injectable context object rather than
//! process-wide globals, so tests construct isolated registries and
//! concurrent configuration stays correct: mutating the key store and
//! invalidating the instance cache happen as one atomic step under a
//! single mutex, and instances are constructed under that same lock so a
//! cached instance can never have been built from a superseded key.

pub mod catalog;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;
use crate::providers::{
    AnthropicProvider, GoogleProvider, LlmProvider, MistralProvider, OpenAiProvider,
    TogetherProvider, XaiProvider,
};
use crate::secrets::SecretStore;
use crate::structured::ExtractionConfig;
use crate::types::{Model, ProviderKind};

pub use catalog::{find_model, models};

struct KeyEntry {
    secret: SecretString,
    /// Explicitly configured keys always beat remote-sourced ones,
    /// independent of call order.
    explicit: bool,
}

#[derive(Default)]
struct RegistryState {
    keys: HashMap<ProviderKind, KeyEntry>,
    instances: HashMap<ProviderKind, Arc<dyn LlmProvider>>,
}

/// Key configuration applied by [`LlmRegistry::configure_api_keys`].
#[derive(Default)]
pub struct ApiKeyConfig<'a> {
    explicit: Vec<(ProviderKind, String)>,
    secret_store: Option<&'a dyn SecretStore>,
}

impl<'a> ApiKeyConfig<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit key for one provider variant.
    pub fn with_key(mut self, kind: ProviderKind, key: impl Into<String>) -> Self {
        self.explicit.push((kind, key.into()));
        self
    }

    /// Fetch a key for every variant from the remote secret store.
    /// Individual fetch failures leave that variant unconfigured.
    pub fn from_secret_store(mut self, store: &'a dyn SecretStore) -> Self {
        self.secret_store = Some(store);
        self
    }
}

/// Owns the process's key store and provider-instance cache.
#[derive(Default)]
pub struct LlmRegistry {
    state: Mutex<RegistryState>,
    extraction: ExtractionConfig,
    degenerate_marker: Option<String>,
}

impl LlmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the JSON-extraction heuristics applied to every provider
    /// this registry constructs.
    pub fn with_extraction_config(mut self, config: ExtractionConfig) -> Self {
        self.extraction = config;
        self
    }

    /// Override the degenerate-output marker checked by every provider
    /// this registry constructs.
    pub fn with_degenerate_marker(mut self, marker: impl Into<String>) -> Self {
        self.degenerate_marker = Some(marker.into());
        self
    }

    /// Apply a key configuration.
    ///
    /// Remote-sourced keys are fetched first; explicit keys are applied
    /// after and marked so a later remote fetch cannot supersede them.
    /// Every successful mutation invalidates the entire instance cache —
    /// the cache has no generation counter, so wholesale invalidation is
    /// the simplest correct policy.
    pub fn configure_api_keys(&self, config: ApiKeyConfig<'_>) {
        let mut state = self.state.lock().expect("registry mutex poisoned");

        if let Some(store) = config.secret_store {
            for kind in ProviderKind::ALL {
                if state.keys.get(&kind).is_some_and(|entry| entry.explicit) {
                    continue;
                }
                match store.get_secret(kind.secret_name()) {
                    Ok(secret) => {
                        state.keys.insert(
                            kind,
                            KeyEntry {
                                secret: SecretString::from(secret),
                                explicit: false,
                            },
                        );
                    }
                    Err(error) => {
                        tracing::warn!(%error, provider = %kind, "leaving provider unconfigured");
                    }
                }
            }
        }

        for (kind, key) in config.explicit {
            state.keys.insert(
                kind,
                KeyEntry {
                    secret: SecretString::from(key),
                    explicit: true,
                },
            );
        }

        state.instances.clear();
    }

    /// Return the cached provider instance for a variant, constructing
    /// one from the currently configured key if necessary.
    pub fn provider(&self, kind: ProviderKind) -> Result<Arc<dyn LlmProvider>, LlmError> {
        let mut state = self.state.lock().expect("registry mutex poisoned");
        if let Some(instance) = state.instances.get(&kind) {
            return Ok(instance.clone());
        }

        let key = state
            .keys
            .get(&kind)
            .ok_or(LlmError::MissingApiKey(kind))?
            .secret
            .expose_secret()
            .to_string();
        let instance = self.build_provider(kind, key)?;
        state.instances.insert(kind, instance.clone());
        Ok(instance)
    }

    /// Check every distinct provider variant the given models need and
    /// aggregate all missing keys into one failure, each with a
    /// representative model id.
    pub fn validate_provider_keys(&self, models: &[&Model]) -> Result<(), LlmError> {
        let state = self.state.lock().expect("registry mutex poisoned");
        let mut missing: Vec<String> = Vec::new();
        let mut reported: Vec<ProviderKind> = Vec::new();
        for model in models {
            if state.keys.contains_key(&model.provider) || reported.contains(&model.provider) {
                continue;
            }
            reported.push(model.provider);
            missing.push(format!("{} (for model {})", model.provider, model.id));
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LlmError::MissingApiKeys { missing })
        }
    }

    fn build_provider(
        &self,
        kind: ProviderKind,
        key: String,
    ) -> Result<Arc<dyn LlmProvider>, LlmError> {
        macro_rules! build {
            ($ty:ident) => {{
                let mut provider = $ty::new(key)?.with_extraction_config(self.extraction.clone());
                if let Some(marker) = &self.degenerate_marker {
                    provider = provider.with_degenerate_marker(marker.clone());
                }
                Arc::new(provider) as Arc<dyn LlmProvider>
            }};
        }
        Ok(match kind {
            ProviderKind::OpenAi => build!(OpenAiProvider),
            ProviderKind::Anthropic => build!(AnthropicProvider),
            ProviderKind::Google => build!(GoogleProvider),
            ProviderKind::Mistral => build!(MistralProvider),
            ProviderKind::Together => build!(TogetherProvider),
            ProviderKind::Xai => build!(XaiProvider),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::test_support::MapSecretStore;

    fn remote_store() -> MapSecretStore {
        MapSecretStore::new(&[
            ("openai-api-key", "remote-openai"),
            ("anthropic-api-key", "remote-anthropic"),
        ])
    }

    fn current_key(registry: &LlmRegistry, kind: ProviderKind) -> Option<String> {
        let state = registry.state.lock().unwrap();
        state
            .keys
            .get(&kind)
            .map(|e| e.secret.expose_secret().to_string())
    }

    #[test]
    fn explicit_key_beats_remote_regardless_of_order() {
        let store = remote_store();

        let registry = LlmRegistry::new();
        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::OpenAi, "A"));
        registry.configure_api_keys(ApiKeyConfig::new().from_secret_store(&store));
        assert_eq!(current_key(&registry, ProviderKind::OpenAi).unwrap(), "A");

        let registry = LlmRegistry::new();
        registry.configure_api_keys(ApiKeyConfig::new().from_secret_store(&store));
        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::OpenAi, "A"));
        assert_eq!(current_key(&registry, ProviderKind::OpenAi).unwrap(), "A");
    }

    #[test]
    fn remote_fetch_failure_leaves_variant_unconfigured() {
        let store = remote_store();
        let registry = LlmRegistry::new();
        registry.configure_api_keys(ApiKeyConfig::new().from_secret_store(&store));

        assert!(current_key(&registry, ProviderKind::Anthropic).is_some());
        assert!(current_key(&registry, ProviderKind::Mistral).is_none());
        assert!(matches!(
            registry.provider(ProviderKind::Mistral),
            Err(LlmError::MissingApiKey(ProviderKind::Mistral))
        ));
    }

    #[test]
    fn provider_instances_are_cached() {
        let registry = LlmRegistry::new();
        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::OpenAi, "k"));
        let first = registry.provider(ProviderKind::OpenAi).unwrap();
        let second = registry.provider(ProviderKind::OpenAi).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn reconfiguring_keys_evicts_cached_instances() {
        let registry = LlmRegistry::new();
        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::OpenAi, "old"));
        let stale = registry.provider(ProviderKind::OpenAi).unwrap();

        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::OpenAi, "new"));
        let fresh = registry.provider(ProviderKind::OpenAi).unwrap();
        assert!(!Arc::ptr_eq(&stale, &fresh));
    }

    #[test]
    fn reconfiguring_any_key_invalidates_the_whole_cache() {
        let registry = LlmRegistry::new();
        registry.configure_api_keys(
            ApiKeyConfig::new()
                .with_key(ProviderKind::OpenAi, "k1")
                .with_key(ProviderKind::Xai, "k2"),
        );
        let openai = registry.provider(ProviderKind::OpenAi).unwrap();

        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::Xai, "k3"));
        let rebuilt = registry.provider(ProviderKind::OpenAi).unwrap();
        assert!(!Arc::ptr_eq(&openai, &rebuilt));
    }

    #[test]
    fn empty_explicit_key_fails_at_construction() {
        let registry = LlmRegistry::new();
        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::Google, ""));
        assert!(matches!(
            registry.provider(ProviderKind::Google),
            Err(LlmError::MissingApiKey(ProviderKind::Google))
        ));
    }

    #[test]
    fn validate_provider_keys_aggregates_all_missing_variants() {
        let registry = LlmRegistry::new();
        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::OpenAi, "k"));

        let wanted: Vec<&Model> = models()
            .iter()
            .filter(|m| {
                matches!(
                    m.provider,
                    ProviderKind::OpenAi | ProviderKind::Anthropic | ProviderKind::Google
                )
            })
            .collect();
        let err = registry.validate_provider_keys(&wanted).unwrap_err();
        match err {
            LlmError::MissingApiKeys { missing } => {
                assert_eq!(missing.len(), 2);
                assert!(missing.iter().any(|m| m.starts_with("anthropic ")));
                assert!(missing.iter().any(|m| m.starts_with("google ")));
                assert!(missing.iter().all(|m| m.contains("for model ")));
            }
            other => panic!("expected MissingApiKeys, got {other:?}"),
        }
    }

    #[test]
    fn configured_registry_still_builds_and_caches_providers() {
        let registry = LlmRegistry::new()
            .with_extraction_config(ExtractionConfig {
                reasoning_tags: vec![("<scratch>".into(), "</scratch>".into())],
            })
            .with_degenerate_marker("looping output");
        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::OpenAi, "k"));
        let first = registry.provider(ProviderKind::OpenAi).unwrap();
        let second = registry.provider(ProviderKind::OpenAi).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn validate_provider_keys_passes_when_all_configured() {
        let registry = LlmRegistry::new();
        registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::Together, "k"));
        let wanted: Vec<&Model> = models()
            .iter()
            .filter(|m| m.provider == ProviderKind::Together)
            .collect();
        assert!(registry.validate_provider_keys(&wanted).is_ok());
    }
}
