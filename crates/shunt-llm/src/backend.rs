//! The [`Backend`] trait: the single capability the gateway core consumes.

use std::sync::Arc;

use async_trait::async_trait;

use shunt_types::{ChatResponse, Message};

use crate::error::Result;

/// Parameters for one generation attempt.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The conversation so far.
    pub messages: Vec<Message>,
    /// The model identifier to generate with.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum output tokens, when bounded.
    pub max_tokens: Option<i64>,
}

impl GenerateRequest {
    /// Create a request with the default temperature and no token bound.
    pub fn new(messages: Vec<Message>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

/// A generative back-end capable of producing chat completions.
///
/// Implementations handle the protocol details of a specific service
/// (remote API, local model, deterministic fake). The gateway core only
/// ever calls this trait; it performs no I/O of its own.
///
/// Cancellation: dropping the future returned by [`generate`](Backend::generate)
/// abandons the attempt. Callers in the escalation loop record no step for
/// an abandoned attempt and start no further ones.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the back-end name, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Execute one generation attempt.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`](crate::error::BackendError) drawn from the
    /// gateway's error taxonomy: timeouts, rate limits, content filters,
    /// auth failures, invalid requests, unknown models, or anything else
    /// the upstream reported.
    async fn generate(&self, request: &GenerateRequest) -> Result<ChatResponse>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<ChatResponse> {
        (**self).generate(request).await
    }
}
