//! The per-request metrics record delivered to the metrics sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routing::ModelTier;

/// Immutable audit record for one gateway request.
///
/// Built once per request by the metrics record builder and handed to the
/// configured sink. The sink owns persistence and aggregation; the gateway
/// only shapes the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Freshly generated identifier for this record.
    pub request_id: String,
    /// When processing started.
    pub created_at: DateTime<Utc>,
    /// When processing completed.
    pub completed_at: DateTime<Utc>,

    /// First 500 characters of the prompt.
    pub prompt_preview: String,
    /// Full prompt length in characters.
    pub prompt_length: usize,

    /// Complexity score assigned by the analyzer.
    pub complexity_score: u8,
    /// Analyzer confidence.
    pub complexity_confidence: f64,
    /// Signal kind names, in detection order.
    pub detected_signals: Vec<String>,

    /// The model the router initially selected.
    pub initial_model: String,
    /// Tier of the initial model.
    pub initial_tier: ModelTier,
    /// The model that produced the final response.
    pub final_model: String,
    /// The router's explanation.
    pub routing_reasoning: String,

    /// Quality score of the final response, when a check ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
    /// Whether the request was escalated at least once.
    pub was_escalated: bool,
    /// Number of escalations performed (attempts minus one).
    pub escalation_depth: usize,
    /// Why escalation was recommended, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,

    /// Latency of the final response in milliseconds.
    pub latency_ms: f64,
    /// Total latency across all attempts in milliseconds.
    pub total_latency_ms: f64,

    /// Tokens in the prompt of the final attempt.
    pub prompt_tokens: i64,
    /// Tokens in the final completion.
    pub completion_tokens: i64,
    /// Total tokens of the final attempt.
    pub total_tokens: i64,
    /// Estimated cost of the final attempt in USD.
    pub estimated_cost: f64,

    /// First 500 characters of the final response, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_preview: Option<String>,
    /// Finish reason reported by the back-end.
    pub finish_reason: String,

    /// Whether an error occurred while handling the request.
    pub error_occurred: bool,
    /// The error message, when one occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
