//! Routing strategies: map a complexity analysis to a model choice.
//!
//! Strategies are value objects behind a one-method trait, swapped at
//! engine construction or at runtime via
//! [`RoutingEngine::set_strategy`](super::RoutingEngine::set_strategy).
//! The engine supplies the timestamp so strategies stay pure.

use chrono::{DateTime, Utc};

use shunt_types::{ComplexityAnalysis, ModelTier, RoutingDecision};

/// Decide which model serves a prompt, given its complexity analysis.
pub trait RoutingStrategy: Send + Sync {
    /// Make a routing decision.
    fn decide(
        &self,
        analysis: &ComplexityAnalysis,
        fast_model: &str,
        complex_model: &str,
        now: DateTime<Utc>,
    ) -> RoutingDecision;
}

/// Threshold-based routing.
///
/// - score below `low`: fast model, no quality check;
/// - score at or above `high`: complex model, no quality check;
/// - in between: fast model with a quality check, so escalation can catch
///   the misses.
///
/// The recommended default: good cost optimization with quality preserved
/// through escalation.
pub struct ThresholdStrategy {
    low: u8,
    high: u8,
}

impl ThresholdStrategy {
    /// Create a strategy with explicit thresholds.
    pub fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::new(30, 70)
    }
}

impl RoutingStrategy for ThresholdStrategy {
    fn decide(
        &self,
        analysis: &ComplexityAnalysis,
        fast_model: &str,
        complex_model: &str,
        now: DateTime<Utc>,
    ) -> RoutingDecision {
        let score = analysis.score;

        if score >= self.high {
            RoutingDecision {
                selected_model: complex_model.to_string(),
                tier: ModelTier::Complex,
                complexity_score: score,
                confidence: analysis.confidence,
                reasoning: format!(
                    "High complexity ({score}) exceeds threshold ({})",
                    self.high
                ),
                requires_quality_check: false,
                timestamp: now,
            }
        } else if score < self.low {
            RoutingDecision {
                selected_model: fast_model.to_string(),
                tier: ModelTier::Fast,
                complexity_score: score,
                confidence: analysis.confidence,
                reasoning: format!(
                    "Low complexity ({score}) below threshold ({})",
                    self.low
                ),
                requires_quality_check: false,
                timestamp: now,
            }
        } else {
            RoutingDecision {
                selected_model: fast_model.to_string(),
                tier: ModelTier::Fast,
                complexity_score: score,
                confidence: analysis.confidence,
                reasoning: format!(
                    "Medium complexity ({score}) - using fast model with quality check"
                ),
                requires_quality_check: true,
                timestamp: now,
            }
        }
    }
}

/// Threshold routing that hedges on low-confidence borderline scores.
///
/// When the analyzer is unsure and the score sits in the borderline band,
/// under-routing a genuinely complex request is the expensive mistake, so
/// the strategy defaults to the complex model.
pub struct ConfidenceAwareStrategy {
    low: u8,
    high: u8,
    confidence_threshold: f64,
    fallback: ThresholdStrategy,
}

impl ConfidenceAwareStrategy {
    /// Create a strategy with explicit thresholds.
    pub fn new(low: u8, high: u8, confidence_threshold: f64) -> Self {
        Self {
            low,
            high,
            confidence_threshold,
            fallback: ThresholdStrategy::new(low, high),
        }
    }
}

impl Default for ConfidenceAwareStrategy {
    fn default() -> Self {
        Self::new(30, 70, 0.6)
    }
}

impl RoutingStrategy for ConfidenceAwareStrategy {
    fn decide(
        &self,
        analysis: &ComplexityAnalysis,
        fast_model: &str,
        complex_model: &str,
        now: DateTime<Utc>,
    ) -> RoutingDecision {
        if analysis.confidence < self.confidence_threshold
            && analysis.score >= self.low
            && analysis.score < self.high
        {
            return RoutingDecision {
                selected_model: complex_model.to_string(),
                tier: ModelTier::Complex,
                complexity_score: analysis.score,
                confidence: analysis.confidence,
                reasoning: format!(
                    "Low confidence ({:.2}) with borderline score ({}) - defaulting to complex model",
                    analysis.confidence, analysis.score
                ),
                requires_quality_check: false,
                timestamp: now,
            };
        }

        self.fallback.decide(analysis, fast_model, complex_model, now)
    }
}

/// Always route to the fast model, with a quality check as the safety net.
///
/// Useful for development or when cost dominates.
pub struct AlwaysFastStrategy;

impl RoutingStrategy for AlwaysFastStrategy {
    fn decide(
        &self,
        analysis: &ComplexityAnalysis,
        fast_model: &str,
        _complex_model: &str,
        now: DateTime<Utc>,
    ) -> RoutingDecision {
        RoutingDecision {
            selected_model: fast_model.to_string(),
            tier: ModelTier::Fast,
            complexity_score: analysis.score,
            confidence: analysis.confidence,
            reasoning: "Strategy: always use fast model (with quality check)".into(),
            requires_quality_check: true,
            timestamp: now,
        }
    }
}

/// Always route to the complex model. Quality first, cost be damned.
pub struct AlwaysComplexStrategy;

impl RoutingStrategy for AlwaysComplexStrategy {
    fn decide(
        &self,
        analysis: &ComplexityAnalysis,
        _fast_model: &str,
        complex_model: &str,
        now: DateTime<Utc>,
    ) -> RoutingDecision {
        RoutingDecision {
            selected_model: complex_model.to_string(),
            tier: ModelTier::Complex,
            complexity_score: analysis.score,
            confidence: analysis.confidence,
            reasoning: "Strategy: always use complex model".into(),
            requires_quality_check: false,
            timestamp: now,
        }
    }
}
