//! Gateway settings schema.
//!
//! All fields have serde defaults, so a partial (or empty) TOML document
//! deserializes into a fully usable configuration. Unknown fields are
//! ignored for forward compatibility.

use serde::{Deserialize, Serialize};

/// Per-category weights for the complexity score.
///
/// The five weights sum to 1.0 by default; overriding them shifts how much
/// each signal family contributes to the final 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    /// Reasoning keywords have the highest impact.
    #[serde(default = "default_keyword_weight")]
    pub keyword: f64,
    /// Code blocks indicate technical complexity.
    #[serde(default = "default_code_weight")]
    pub code: f64,
    /// Math content requires analytical thinking.
    #[serde(default = "default_math_weight")]
    pub math: f64,
    /// Multi-part questions add complexity.
    #[serde(default = "default_multipart_weight")]
    pub multipart: f64,
    /// Longer prompts tend to be more complex.
    #[serde(default = "default_length_weight")]
    pub length: f64,
}

fn default_keyword_weight() -> f64 {
    0.35
}
fn default_code_weight() -> f64 {
    0.25
}
fn default_math_weight() -> f64 {
    0.20
}
fn default_multipart_weight() -> f64 {
    0.10
}
fn default_length_weight() -> f64 {
    0.10
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            keyword: default_keyword_weight(),
            code: default_code_weight(),
            math: default_math_weight(),
            multipart: default_multipart_weight(),
            length: default_length_weight(),
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Fast/cheap model for simple prompts.
    #[serde(default = "default_fast_model")]
    pub fast_model: String,

    /// Complex/reasoning model for difficult prompts.
    #[serde(default = "default_complex_model")]
    pub complex_model: String,

    /// Below this complexity score: fast model, no quality check.
    #[serde(default = "default_threshold_low")]
    pub complexity_threshold_low: u8,

    /// At or above this complexity score: complex model directly.
    #[serde(default = "default_threshold_high")]
    pub complexity_threshold_high: u8,

    /// Below this quality score: escalate to the complex model.
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: u8,

    /// Maximum number of escalation attempts, clamped to `1..=5`.
    #[serde(default = "default_max_escalation_depth")]
    pub max_escalation_depth: u8,

    /// Per-attempt back-end deadline in seconds.
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: f64,

    /// USD per 1M input tokens on the flash tier.
    #[serde(default = "default_cost_flash_input")]
    pub cost_flash_input: f64,

    /// USD per 1M output tokens on the flash tier.
    #[serde(default = "default_cost_flash_output")]
    pub cost_flash_output: f64,

    /// USD per 1M input tokens on the pro tier.
    #[serde(default = "default_cost_pro_input")]
    pub cost_pro_input: f64,

    /// USD per 1M output tokens on the pro tier.
    #[serde(default = "default_cost_pro_output")]
    pub cost_pro_output: f64,

    /// Analyzer category weight overrides.
    #[serde(default)]
    pub signal_weights: SignalWeights,
}

fn default_fast_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_complex_model() -> String {
    "gemini-2.0-flash-thinking-exp".into()
}
fn default_threshold_low() -> u8 {
    30
}
fn default_threshold_high() -> u8 {
    70
}
fn default_quality_threshold() -> u8 {
    60
}
fn default_max_escalation_depth() -> u8 {
    2
}
fn default_llm_timeout_secs() -> f64 {
    60.0
}
fn default_cost_flash_input() -> f64 {
    0.075
}
fn default_cost_flash_output() -> f64 {
    0.30
}
fn default_cost_pro_input() -> f64 {
    1.25
}
fn default_cost_pro_output() -> f64 {
    5.00
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fast_model: default_fast_model(),
            complex_model: default_complex_model(),
            complexity_threshold_low: default_threshold_low(),
            complexity_threshold_high: default_threshold_high(),
            quality_threshold: default_quality_threshold(),
            max_escalation_depth: default_max_escalation_depth(),
            llm_timeout_secs: default_llm_timeout_secs(),
            cost_flash_input: default_cost_flash_input(),
            cost_flash_output: default_cost_flash_output(),
            cost_pro_input: default_cost_pro_input(),
            cost_pro_output: default_cost_pro_output(),
            signal_weights: SignalWeights::default(),
        }
    }
}

impl Settings {
    /// Clamp out-of-range fields to their documented bounds.
    pub fn normalized(mut self) -> Self {
        self.max_escalation_depth = self.max_escalation_depth.clamp(1, 5);
        self.complexity_threshold_low = self.complexity_threshold_low.min(100);
        self.complexity_threshold_high = self.complexity_threshold_high.min(100);
        self.quality_threshold = self.quality_threshold.min(100);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.fast_model, "gemini-2.0-flash");
        assert_eq!(s.complex_model, "gemini-2.0-flash-thinking-exp");
        assert_eq!(s.complexity_threshold_low, 30);
        assert_eq!(s.complexity_threshold_high, 70);
        assert_eq!(s.quality_threshold, 60);
        assert_eq!(s.max_escalation_depth, 2);
        assert!((s.llm_timeout_secs - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_weights_sum_to_one() {
        let w = SignalWeights::default();
        let sum = w.keyword + w.code + w.math + w.multipart + w.length;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalized_clamps_depth() {
        let mut s = Settings::default();
        s.max_escalation_depth = 0;
        assert_eq!(s.normalized().max_escalation_depth, 1);

        let mut s = Settings::default();
        s.max_escalation_depth = 9;
        assert_eq!(s.normalized().max_escalation_depth, 5);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(s.quality_threshold, 60);
        assert!((s.signal_weights.keyword - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_weight_override_keeps_other_defaults() {
        let s: Settings = serde_json::from_str(r#"{"signal_weights":{"keyword":0.8}}"#).unwrap();
        assert!((s.signal_weights.keyword - 0.8).abs() < f64::EPSILON);
        assert!((s.signal_weights.code - 0.25).abs() < f64::EPSILON);
    }
}
