//! Routing decisions produced by the routing engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cost/capability tier of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap, low-latency model.
    Fast,
    /// Expensive, more capable model.
    Complex,
}

/// The outcome of routing one prompt.
///
/// Invariant: `tier == ModelTier::Fast` exactly when `selected_model` is the
/// configured fast model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// The model identifier to use.
    pub selected_model: String,
    /// Tier classification of the selected model.
    pub tier: ModelTier,
    /// Complexity score that led to this decision.
    pub complexity_score: u8,
    /// Confidence carried over from the analysis.
    pub confidence: f64,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
    /// Whether the response should be quality-checked for escalation.
    pub requires_quality_check: bool,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}
