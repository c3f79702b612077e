//! Prompt complexity signals and the analysis result they roll up into.

use serde::{Deserialize, Serialize};

/// The category of a detected complexity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// A reasoning keyword such as "analyze" or "step by step".
    ReasoningKeyword,
    /// A code fence, inline code span, or programming construct.
    CodeBlock,
    /// LaTeX notation, arithmetic, or mathematical vocabulary.
    MathExpression,
    /// List markers, enumeration adverbs, or stacked questions.
    MultipartQuestion,
    /// The single signal derived from prompt length.
    Length,
}

impl SignalKind {
    /// Stable snake_case name, used in metrics records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReasoningKeyword => "reasoning_keyword",
            Self::CodeBlock => "code_block",
            Self::MathExpression => "math_expression",
            Self::MultipartQuestion => "multipart_question",
            Self::Length => "length",
        }
    }
}

/// One complexity signal found in a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSignal {
    /// Category of the signal.
    pub kind: SignalKind,
    /// The matched text, truncated to a short display form.
    pub value: String,
    /// Importance of this signal in `0.0..=1.0`.
    pub weight: f64,
    /// Character offset of the match, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Categorical complexity classification derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    /// Map a 0-100 score to its level: low < 30 <= medium < 70 <= high.
    pub fn from_score(score: u8) -> Self {
        if score < 30 {
            Self::Low
        } else if score < 70 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Complete complexity analysis for one prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    /// Overall complexity score in `0..=100`.
    pub score: u8,
    /// Confidence in the assessment in `0.0..=1.0`.
    pub confidence: f64,
    /// Categorical level, always `ComplexityLevel::from_score(score)`.
    pub level: ComplexityLevel,
    /// All detected signals, in detector scan order.
    pub signals: Vec<DetectedSignal>,
    /// Length of the analyzed prompt in characters.
    pub prompt_length: usize,
    /// Human-readable explanation of the score.
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(ComplexityLevel::from_score(0), ComplexityLevel::Low);
        assert_eq!(ComplexityLevel::from_score(29), ComplexityLevel::Low);
        assert_eq!(ComplexityLevel::from_score(30), ComplexityLevel::Medium);
        assert_eq!(ComplexityLevel::from_score(69), ComplexityLevel::Medium);
        assert_eq!(ComplexityLevel::from_score(70), ComplexityLevel::High);
        assert_eq!(ComplexityLevel::from_score(100), ComplexityLevel::High);
    }

    #[test]
    fn signal_kind_names() {
        assert_eq!(SignalKind::ReasoningKeyword.as_str(), "reasoning_keyword");
        assert_eq!(SignalKind::Length.as_str(), "length");
    }

    #[test]
    fn signal_position_skipped_when_absent() {
        let s = DetectedSignal {
            kind: SignalKind::Length,
            value: "12 characters".into(),
            weight: 0.1,
            position: None,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("position"));
    }
}
