//! Error handling for the provider layer.
//!
//! A single [`LlmError`] enum covers configuration, transport, vendor and
//! extraction failures. Classification matters more than variety here: the
//! retry engine asks [`LlmError::is_retryable`] and treats everything
//! retryable as transient, retrying indefinitely. Permanent variants carry
//! enough context (status, excerpt, parsed data) to diagnose the failure
//! without re-running the call.

use crate::types::ProviderKind;

/// Maximum number of characters of raw vendor output carried in
/// parse/validation errors.
pub const ERROR_EXCERPT_LEN: usize = 200;

/// Errors produced by providers, the registry and the structured-output
/// pipeline.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport-level failure (connect, timeout, body read). Transient.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success HTTP status from a vendor endpoint. Transient by policy:
    /// rate limits and server hiccups dominate in practice.
    #[error("{provider} API error (status {status}): {message}")]
    ApiError {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    /// Vendor reported a response status other than "completed". Permanent.
    #[error("{provider} response incomplete (status={status}, reason={reason:?})")]
    IncompleteResponse {
        provider: ProviderKind,
        status: String,
        reason: Option<String>,
    },

    /// Vendor returned no content, or content that flattened to an empty
    /// string. Retrying a confirmed-empty completion is futile. Permanent.
    #[error("{provider} returned empty content: {detail}")]
    EmptyContent {
        provider: ProviderKind,
        detail: String,
    },

    /// The extracted candidate text failed to parse as JSON. Permanent.
    #[error("failed to parse JSON from {provider} response: {message}. Response text: {excerpt}")]
    JsonParse {
        provider: ProviderKind,
        message: String,
        excerpt: String,
    },

    /// Parsed JSON did not match the caller-supplied schema. Permanent.
    #[error("{provider} response did not match expected schema: {message}. Response data: {data}")]
    SchemaValidation {
        provider: ProviderKind,
        message: String,
        data: serde_json::Value,
        excerpt: String,
    },

    /// The caller omitted a parameter the vendor contract requires.
    /// A programming error, raised before any request is issued.
    #[error("missing required parameter `{parameter}` for {provider}")]
    MissingParameter {
        provider: ProviderKind,
        parameter: &'static str,
    },

    /// Provider constructed without an API key.
    #[error("API key required for {0} provider; call configure_api_keys() first")]
    MissingApiKey(ProviderKind),

    /// Aggregated key-validation failure listing every unconfigured
    /// provider with a representative model id.
    #[error("API keys not configured for the following providers: {}. Call configure_api_keys() to set them.", .missing.join(", "))]
    MissingApiKeys { missing: Vec<String> },

    /// The vendor rejected the prompt for degenerate repeated output and a
    /// structured call cannot substitute the text sentinel.
    #[error("{provider} reported repetitive output patterns; the prompt needs reformatting")]
    DegenerateCompletion { provider: ProviderKind },

    /// Invalid schema or other caller-side configuration problem.
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl LlmError {
    /// Whether the retry engine should keep retrying after this error.
    ///
    /// Everything is transient unless explicitly classified otherwise; the
    /// permanent set is exactly the bounded list below.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::IncompleteResponse { .. }
                | Self::EmptyContent { .. }
                | Self::JsonParse { .. }
                | Self::SchemaValidation { .. }
                | Self::MissingParameter { .. }
                | Self::MissingApiKey(_)
                | Self::MissingApiKeys { .. }
                | Self::DegenerateCompletion { .. }
                | Self::ConfigurationError(_)
        )
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

/// Truncate raw vendor output for inclusion in error messages.
pub(crate) fn excerpt(text: &str) -> String {
    text.chars().take(ERROR_EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_by_default() {
        assert!(LlmError::HttpError("connection reset".into()).is_retryable());
        assert!(
            LlmError::ApiError {
                provider: ProviderKind::OpenAi,
                status: 429,
                message: "rate limited".into(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn permanent_set_is_not_retryable() {
        let errors = [
            LlmError::IncompleteResponse {
                provider: ProviderKind::OpenAi,
                status: "incomplete".into(),
                reason: None,
            },
            LlmError::EmptyContent {
                provider: ProviderKind::Together,
                detail: "flattened to empty string".into(),
            },
            LlmError::JsonParse {
                provider: ProviderKind::Mistral,
                message: "expected value".into(),
                excerpt: "oops".into(),
            },
            LlmError::MissingParameter {
                provider: ProviderKind::Anthropic,
                parameter: "max_tokens",
            },
            LlmError::MissingApiKey(ProviderKind::Google),
        ];
        for err in errors {
            assert!(!err.is_retryable(), "{err} should be permanent");
        }
    }

    #[test]
    fn excerpt_truncates_to_limit() {
        let long = "x".repeat(500);
        assert_eq!(excerpt(&long).len(), ERROR_EXCERPT_LEN);
        assert_eq!(excerpt("short"), "short");
    }
}
