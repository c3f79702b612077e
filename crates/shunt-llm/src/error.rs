//! Typed errors surfaced by generative back-ends.
//!
//! The escalation loop never recovers from these: the first error ends the
//! loop and propagates to the caller unchanged.

use thiserror::Error;

/// Errors a back-end capability may return.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The attempt exceeded the configured deadline.
    #[error("request to {model} timed out after {timeout_secs}s")]
    Timeout {
        /// The model the attempt targeted.
        model: String,
        /// The deadline that elapsed, in seconds.
        timeout_secs: f64,
    },

    /// The upstream signalled throttling.
    #[error("rate limit exceeded for {model}")]
    RateLimited {
        /// The model the attempt targeted.
        model: String,
        /// Suggested wait before retrying, in seconds, when the upstream
        /// provided one.
        retry_after_secs: Option<f64>,
    },

    /// The upstream refused the content on safety grounds.
    #[error("content blocked by {model}")]
    ContentFilter {
        /// The model that blocked the content.
        model: String,
        /// Upstream-provided reason, when available.
        reason: Option<String>,
    },

    /// Credentials missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The upstream rejected the request as malformed.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// The model the attempt targeted, when known.
        model: Option<String>,
        /// Upstream rejection detail.
        message: String,
    },

    /// The chosen model identifier is unknown upstream.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Catch-all for anything else the upstream reported.
    #[error("backend error: {message}")]
    Other {
        /// The model the attempt targeted, when known.
        model: Option<String>,
        /// Upstream error detail.
        message: String,
    },
}

/// Convenience alias for back-end operations.
pub type Result<T> = std::result::Result<T, BackendError>;
