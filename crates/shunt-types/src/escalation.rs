//! Escalation chains: the ordered record of attempts made for one request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single generation attempt inside an escalation chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationStep {
    /// The model used for this attempt.
    pub model_used: String,
    /// First 200 characters of the response.
    pub response_preview: String,
    /// Quality score of this response.
    pub quality_score: u8,
    /// Whether this step triggered the next attempt.
    pub escalated: bool,
    /// Latency of this attempt in milliseconds.
    pub latency_ms: f64,
    /// When this attempt completed.
    pub timestamp: DateTime<Utc>,
}

/// The complete escalation record for one request.
///
/// Invariants: the last step's `model_used` equals `final_model`,
/// `total_attempts == steps.len()`, and `total_latency_ms` is the sum of
/// the step latencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationChain {
    /// Unique identifier for this request.
    pub request_id: String,
    /// First 200 characters of the original prompt.
    pub original_prompt_preview: String,
    /// All attempts, in order. Never empty.
    pub steps: Vec<EscalationStep>,
    /// The model that produced the final response.
    pub final_model: String,
    /// The final response content.
    pub final_response: String,
    /// Total number of generation attempts.
    pub total_attempts: usize,
    /// Total latency across all attempts in milliseconds.
    pub total_latency_ms: f64,
    /// True when the depth bound stopped an escalation that quality
    /// checking still wanted.
    pub escalation_prevented_loop: bool,
}

/// A response assembled from one or more attempts of a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResponse {
    /// The main response content.
    pub primary_response: String,
    /// Additional context from earlier attempts, when the strategy keeps it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supporting_context: Option<String>,
    /// Models that contributed, in attempt order.
    pub models_used: Vec<String>,
    /// Label of the strategy that assembled this response.
    pub strategy_label: String,
}
