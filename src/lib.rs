//! # llm-relay
//!
//! A unified interface over several text-generation vendors: one
//! capability contract ([`LlmProvider`]), an indefinite-retry engine with
//! a bounded permanent-failure classification, and a best-effort
//! structured-output recovery pipeline for vendors without native
//! schema-constrained generation.
//!
//! ```rust,no_run
//! use llm_relay::prelude::*;
//!
//! # async fn example() -> Result<(), LlmError> {
//! let registry = LlmRegistry::new();
//! registry.configure_api_keys(ApiKeyConfig::new().with_key(ProviderKind::OpenAi, "sk-..."));
//!
//! let model = find_model("gpt-4.1-mini").expect("catalog entry");
//! let text = model
//!     .get_response(&registry, "Hello!", &RequestOptions::new())
//!     .await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod content;
pub mod error;
pub mod providers;
pub mod registry;
pub mod retry;
pub mod schema;
pub mod secrets;
pub mod structured;
pub mod types;

pub use error::LlmError;
pub use providers::LlmProvider;
pub use registry::{find_model, models, ApiKeyConfig, LlmRegistry};
pub use retry::RetryEngine;
pub use schema::ResponseSchema;
pub use structured::ExtractionConfig;
pub use types::{Lab, Model, ProviderKind, RequestOptions};

/// Convenience imports for typical callers.
pub mod prelude {
    pub use crate::error::LlmError;
    pub use crate::providers::LlmProvider;
    pub use crate::registry::{find_model, models, ApiKeyConfig, LlmRegistry};
    pub use crate::schema::ResponseSchema;
    pub use crate::secrets::SecretStore;
    pub use crate::types::{Lab, Model, ProviderKind, RequestOptions};
}
