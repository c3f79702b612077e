//! Per-attempt deadline enforcement.
//!
//! [`DeadlineBackend`] wraps any [`Backend`] and bounds each generation
//! attempt with a timeout. An elapsed deadline surfaces as
//! [`BackendError::Timeout`], which ends the escalation loop like any other
//! back-end error.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use shunt_types::ChatResponse;

use crate::backend::{Backend, GenerateRequest};
use crate::error::{BackendError, Result};

/// A backend wrapper that enforces a per-attempt deadline.
///
/// # Example
///
/// ```rust,ignore
/// use shunt_llm::DeadlineBackend;
///
/// let backend = DeadlineBackend::new(inner, settings.llm_timeout_secs);
/// // Calls through `backend` now fail with BackendError::Timeout when the
/// // inner backend takes longer than the deadline.
/// ```
pub struct DeadlineBackend<B> {
    inner: B,
    timeout_secs: f64,
}

impl<B: Backend> DeadlineBackend<B> {
    /// Wrap a backend with a deadline in seconds.
    pub fn new(inner: B, timeout_secs: f64) -> Self {
        Self {
            inner,
            timeout_secs,
        }
    }

    /// Returns the configured deadline in seconds.
    pub fn timeout_secs(&self) -> f64 {
        self.timeout_secs
    }

    /// Returns a reference to the wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: Backend> Backend for DeadlineBackend<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<ChatResponse> {
        let deadline = Duration::from_secs_f64(self.timeout_secs.max(0.0));
        match tokio::time::timeout(deadline, self.inner.generate(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    backend = %self.inner.name(),
                    model = %request.model,
                    timeout_secs = self.timeout_secs,
                    "backend attempt exceeded deadline"
                );
                Err(BackendError::Timeout {
                    model: request.model.clone(),
                    timeout_secs: self.timeout_secs,
                })
            }
        }
    }
}
