//! Response quality issues and the assessment they roll up into.

use serde::{Deserialize, Serialize};

/// The category of a detected quality defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssueKind {
    /// Hedging phrases ("I'm not sure", "probably", ...).
    Uncertainty,
    /// The response appears cut off or unfinished.
    Incomplete,
    /// The model declared itself unable to complete the task.
    FailedReasoning,
    /// The model explicitly declined to answer.
    Refusal,
    /// The response is shorter than the prompt complexity warrants.
    TooShort,
    /// Repeated sentences or phrases.
    Repetition,
}

/// One quality defect found in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    /// Category of the defect.
    pub kind: QualityIssueKind,
    /// Human-readable description.
    pub description: String,
    /// Severity in `0.0..=1.0`.
    pub severity: f64,
    /// A short snippet supporting the finding, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

/// Complete quality assessment of one response.
///
/// Invariants: `should_escalate == (score < threshold)` for the threshold
/// the checker was built with, and `score == 100` when `issues` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// Quality score in `0..=100` (100 = no issues).
    pub score: u8,
    /// All detected issues.
    pub issues: Vec<QualityIssue>,
    /// Whether the response should be retried on a better model.
    pub should_escalate: bool,
    /// Why escalation was recommended, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
    /// Confidence in the assessment in `0.0..=1.0`.
    pub confidence: f64,
}
