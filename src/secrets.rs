//! Remote secret store collaborator contract.
//!
//! The registry can source API keys from an external secret store during
//! [`crate::registry::LlmRegistry::configure_api_keys`]. The store itself
//! (GCP Secret Manager or similar) lives outside this crate; only the
//! contract is defined here.

/// Failure to resolve a named secret: unset, unreachable, or the store is
/// not configured at all.
#[derive(Debug, thiserror::Error)]
#[error("failed to resolve secret `{name}`: {reason}")]
pub struct SecretError {
    pub name: String,
    pub reason: String,
}

/// External secret retrieval contract.
pub trait SecretStore: Send + Sync {
    /// Fetch the secret stored under `name`.
    fn get_secret(&self, name: &str) -> Result<String, SecretError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;

    /// In-memory store for registry tests.
    pub struct MapSecretStore {
        secrets: HashMap<String, String>,
    }

    impl MapSecretStore {
        pub fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                secrets: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl SecretStore for MapSecretStore {
        fn get_secret(&self, name: &str) -> Result<String, SecretError> {
            self.secrets.get(name).cloned().ok_or_else(|| SecretError {
                name: name.to_string(),
                reason: "secret not found".to_string(),
            })
        }
    }
}
