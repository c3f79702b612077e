//! Response quality checking.
//!
//! [`QualityChecker`] aggregates the six quality detectors into a
//! [`QualityAssessment`] and recommends escalation when the score falls
//! below the configured threshold. Like the analyzer, it is pure and
//! deterministic: pattern scans only, no semantic judgement.

mod detectors;

use shunt_types::{QualityAssessment, QualityIssue, QualityIssueKind, Settings};

use self::detectors::QualityDetectors;

const DEFAULT_MIN_RESPONSE_LENGTH: usize = 50;

/// Deterministic response auditor.
///
/// # Example
///
/// ```rust,ignore
/// use shunt_core::QualityChecker;
///
/// let checker = QualityChecker::new(&settings);
/// let assessment = checker.check("I'm not sure, maybe 42...", 65);
/// if assessment.should_escalate {
///     println!("{}", assessment.escalation_reason.unwrap());
/// }
/// ```
pub struct QualityChecker {
    detectors: QualityDetectors,
    min_response_length: usize,
    quality_threshold: u8,
}

impl QualityChecker {
    /// Create a checker with the threshold from settings.
    pub fn new(settings: &Settings) -> Self {
        Self::with_limits(settings.quality_threshold, DEFAULT_MIN_RESPONSE_LENGTH)
    }

    /// Create a checker with explicit threshold and minimum length.
    pub fn with_limits(quality_threshold: u8, min_response_length: usize) -> Self {
        Self {
            detectors: QualityDetectors::new(),
            min_response_length,
            quality_threshold,
        }
    }

    /// The score below which escalation is recommended.
    pub fn quality_threshold(&self) -> u8 {
        self.quality_threshold
    }

    /// Check a response and recommend escalation if warranted.
    ///
    /// `prompt_complexity` scales the expected response length: complex
    /// prompts deserve longer answers.
    pub fn check(&self, response_text: &str, prompt_complexity: u8) -> QualityAssessment {
        if response_text.trim().is_empty() {
            return QualityAssessment {
                score: 0,
                issues: vec![QualityIssue {
                    kind: QualityIssueKind::TooShort,
                    description: "Response is empty".into(),
                    severity: 1.0,
                    evidence: Some("(empty response)".into()),
                }],
                should_escalate: true,
                escalation_reason: Some("Empty response received".into()),
                confidence: 1.0,
            };
        }

        let mut issues: Vec<QualityIssue> = Vec::new();
        issues.extend(self.detectors.uncertainty(response_text));
        issues.extend(self.detectors.incomplete(response_text));
        issues.extend(self.detectors.failed_reasoning(response_text));
        issues.extend(self.detectors.refusal(response_text));
        issues.extend(detectors::too_short(
            response_text,
            self.min_response_length,
            prompt_complexity,
        ));
        issues.extend(detectors::repetition(response_text));

        let score = score(&issues);
        let should_escalate = score < self.quality_threshold;
        let escalation_reason = if should_escalate {
            Some(self.escalation_reason(score, &issues))
        } else {
            None
        };
        let confidence = confidence(&issues, response_text);

        QualityAssessment {
            score,
            issues,
            should_escalate,
            escalation_reason,
            confidence,
        }
    }

    fn escalation_reason(&self, score: u8, issues: &[QualityIssue]) -> String {
        match main_issue(issues) {
            Some(main) => format!(
                "Quality score {score} below threshold ({}). Main issue: {}",
                self.quality_threshold, main.description
            ),
            None => format!(
                "Quality score {score} below threshold ({})",
                self.quality_threshold
            ),
        }
    }
}

/// The highest-severity issue; the first one wins ties.
fn main_issue(issues: &[QualityIssue]) -> Option<&QualityIssue> {
    let mut best: Option<&QualityIssue> = None;
    for issue in issues {
        match best {
            Some(b) if b.severity >= issue.severity => {}
            _ => best = Some(issue),
        }
    }
    best
}

/// Score 0-100: each issue subtracts up to 25 points by severity.
fn score(issues: &[QualityIssue]) -> u8 {
    if issues.is_empty() {
        return 100;
    }
    let penalty: f64 = issues.iter().map(|i| i.severity * 25.0).sum();
    (100.0 - penalty).max(0.0) as u8
}

/// Confidence in the assessment: more text and clearer issues raise it.
fn confidence(issues: &[QualityIssue], response_text: &str) -> f64 {
    let length_factor = (response_text.chars().count() as f64 / 500.0).min(1.0);

    let issue_clarity = if issues.is_empty() {
        0.7
    } else {
        issues.iter().map(|i| i.severity).sum::<f64>() / issues.len() as f64
    };

    let confidence = (length_factor * 0.4 + issue_clarity * 0.6).min(1.0);
    (confidence * 100.0).round() / 100.0
}
