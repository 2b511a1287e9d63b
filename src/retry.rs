//! Retry engine for vendor calls.
//!
//! The engine drives a small state machine over a zero-argument async
//! operation: Idle -> Calling -> {Done | Failed | Backoff}, with Backoff
//! returning to Calling after one sleep interval. Vendor and network
//! errors are assumed transient unless classified otherwise, so attempts
//! are unbounded; the only exits are success and a permanent failure.
//!
//! Sleeping is behind the [`Sleeper`] trait so tests can drive many
//! backoff cycles without real delay.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::LlmError;
use crate::types::ProviderKind;

/// Default backoff interval between attempts.
pub const DEFAULT_WAIT_TIME: Duration = Duration::from_secs(30);

/// Substring marking the degenerate repeated-output condition in vendor
/// error messages. A fragile heuristic inherited from observed behavior;
/// overridable via [`RetryEngine::with_degenerate_marker`].
pub const DEGENERATE_OUTPUT_MARKER: &str = "repetitive patterns";

/// Sentinel returned from plain-text calls when the degenerate condition
/// short-circuits the retry loop.
pub const REFORMAT_SENTINEL: &str = "need_a_new_reformat_prompt";

/// Injectable sleep, defaulting to `tokio::time::sleep`.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    Calling,
    Backoff,
}

/// Executes operations with indefinite retry on transient failure.
#[derive(Clone)]
pub struct RetryEngine {
    sleeper: Arc<dyn Sleeper>,
    degenerate_marker: String,
    provider: Option<ProviderKind>,
}

impl Default for RetryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryEngine {
    pub fn new() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            degenerate_marker: DEGENERATE_OUTPUT_MARKER.to_string(),
            provider: None,
        }
    }

    /// Attribute sentinel-less degenerate failures to this provider.
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the sleeper (deterministic tests).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Replace the degenerate-output marker substring.
    pub fn with_degenerate_marker(mut self, marker: impl Into<String>) -> Self {
        self.degenerate_marker = marker.into();
        self
    }

    /// Run `operation` until it succeeds or fails permanently.
    ///
    /// Transient errors are logged with `context` and retried after
    /// sleeping `wait`. A permanent error is re-raised immediately, with
    /// no sleep. When the error message contains the degenerate-output
    /// marker, the loop short-circuits to the `sentinel` value if one was
    /// supplied; callers without a meaningful sentinel (structured calls)
    /// receive a typed [`LlmError::DegenerateCompletion`] instead.
    pub async fn run<T, F, Fut>(
        &self,
        context: &str,
        wait: Duration,
        sentinel: Option<T>,
        mut operation: F,
    ) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, LlmError>> + Send,
        T: Send,
    {
        let mut sentinel = sentinel;
        let mut state = RetryState::Calling;
        loop {
            if state == RetryState::Backoff {
                tracing::info!(wait_secs = wait.as_secs_f64(), "waiting before retrying");
                self.sleeper.sleep(wait).await;
                state = RetryState::Calling;
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if !error.is_retryable() => return Err(error),
                Err(error) if error.to_string().contains(&self.degenerate_marker) => {
                    tracing::info!(
                        "repetitive patterns detected in the prompt; requesting a reformat"
                    );
                    return match sentinel.take() {
                        Some(value) => Ok(value),
                        None => {
                            let provider = match &error {
                                LlmError::ApiError { provider, .. } => Some(*provider),
                                _ => None,
                            }
                            .or(self.provider);
                            Err(match provider {
                                Some(provider) => LlmError::DegenerateCompletion { provider },
                                None => error,
                            })
                        }
                    };
                }
                Err(error) => {
                    tracing::info!(%error, "{context}");
                    state = RetryState::Backoff;
                }
            }
        }
    }
}
