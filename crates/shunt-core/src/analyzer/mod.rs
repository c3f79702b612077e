//! Prompt complexity analysis for model routing.
//!
//! [`PromptAnalyzer`] turns raw prompt text into a 0-100 complexity score
//! with an explanation. It relies on five signal families that correlate
//! with cognitive load:
//!
//! 1. Reasoning keywords ("analyze", "compare", "step by step", ...)
//! 2. Code blocks and programming content
//! 3. Mathematical expressions and notation
//! 4. Multi-part question structure
//! 5. Overall prompt length
//!
//! The analyzer does **not** use an LLM or neural model; it is pure,
//! deterministic, and cheap enough to run on every request.

mod catalog;
mod signals;

use shunt_types::{
    ComplexityAnalysis, ComplexityLevel, DetectedSignal, SignalWeights,
};

use self::signals::SignalDetectors;

/// Signal-weighted prompt complexity classifier.
///
/// # Example
///
/// ```rust,ignore
/// use shunt_core::PromptAnalyzer;
///
/// let analyzer = PromptAnalyzer::new();
/// let result = analyzer.analyze("Explain step by step how to debug this code");
/// assert!(result.score > 30);
/// ```
pub struct PromptAnalyzer {
    weights: SignalWeights,
    detectors: SignalDetectors,
}

impl PromptAnalyzer {
    /// Create an analyzer with the default category weights.
    pub fn new() -> Self {
        Self::with_weights(SignalWeights::default())
    }

    /// Create an analyzer with overridden category weights.
    pub fn with_weights(weights: SignalWeights) -> Self {
        Self {
            weights,
            detectors: SignalDetectors::new(),
        }
    }

    /// Analyze a prompt and return its complexity assessment.
    ///
    /// An empty or whitespace-only prompt short-circuits to score 0 with
    /// full confidence and no signals.
    pub fn analyze(&self, prompt: &str) -> ComplexityAnalysis {
        if prompt.trim().is_empty() {
            return ComplexityAnalysis {
                score: 0,
                confidence: 1.0,
                level: ComplexityLevel::Low,
                signals: Vec::new(),
                prompt_length: 0,
                reasoning: "Empty prompt".into(),
            };
        }

        let keyword_signals = signals::deduplicate(self.detectors.reasoning_keywords(prompt));
        let code_signals = signals::deduplicate(self.detectors.code_blocks(prompt));
        let math_signals = signals::deduplicate(self.detectors.math_expressions(prompt));
        let multipart_signals = signals::deduplicate(self.detectors.multipart_questions(prompt));
        let length_signal = signals::length_signal(prompt);

        let score = self.score(
            &keyword_signals,
            &code_signals,
            &math_signals,
            &multipart_signals,
            &length_signal,
        );

        let reasoning = reasoning_text(
            &keyword_signals,
            &code_signals,
            &math_signals,
            &multipart_signals,
            &length_signal,
            score,
        );

        let mut all_signals = keyword_signals;
        all_signals.extend(code_signals);
        all_signals.extend(math_signals);
        all_signals.extend(multipart_signals);
        all_signals.push(length_signal);

        let confidence = confidence(&all_signals, score);

        ComplexityAnalysis {
            score,
            confidence,
            level: ComplexityLevel::from_score(score),
            signals: all_signals,
            prompt_length: prompt.chars().count(),
            reasoning,
        }
    }

    /// Weighted 0-100 score with per-category diminishing returns.
    fn score(
        &self,
        keywords: &[DetectedSignal],
        code: &[DetectedSignal],
        math: &[DetectedSignal],
        multipart: &[DetectedSignal],
        length: &DetectedSignal,
    ) -> u8 {
        let total = aggregate(keywords) * self.weights.keyword
            + aggregate(code) * self.weights.code
            + aggregate(math) * self.weights.math
            + aggregate(multipart) * self.weights.multipart
            + length.weight * self.weights.length;

        (total * 100.0).min(100.0) as u8
    }
}

impl Default for PromptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate one category's signal weights with diminishing returns.
///
/// The strongest signal counts in full; each subsequent one decays by 0.7,
/// at most five are counted, and the category is capped at 1.0. This stops
/// repetitive patterns from inflating the score.
fn aggregate(signals: &[DetectedSignal]) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }

    let mut weights: Vec<f64> = signals.iter().map(|s| s.weight).collect();
    weights.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let total: f64 = weights
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, w)| w * 0.7_f64.powi(i as i32))
        .sum();

    total.min(1.0)
}

/// Confidence in the assessment: strong signals, many signals, and an
/// extreme score all raise it.
fn confidence(signals: &[DetectedSignal], score: u8) -> f64 {
    if signals.is_empty() {
        return 0.5;
    }

    let avg_weight = signals.iter().map(|s| s.weight).sum::<f64>() / signals.len() as f64;
    let count_factor = (signals.len() as f64 / 5.0).min(1.0);
    let extremity = (f64::from(score) - 50.0).abs() / 50.0;

    let confidence = avg_weight * 0.4 + count_factor * 0.3 + extremity * 0.3;
    (confidence * 100.0).round() / 100.0
}

/// Human-readable explanation of the analysis.
fn reasoning_text(
    keywords: &[DetectedSignal],
    code: &[DetectedSignal],
    math: &[DetectedSignal],
    multipart: &[DetectedSignal],
    length: &DetectedSignal,
    score: u8,
) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if !keywords.is_empty() {
        let shown: Vec<&str> = keywords.iter().take(3).map(|s| s.value.as_str()).collect();
        reasons.push(format!(
            "Contains reasoning keywords: {}",
            shown.join(", ")
        ));
    }

    if !code.is_empty() {
        reasons.push(format!("Contains {} code block(s)", code.len()));
    }

    if !math.is_empty() {
        reasons.push("Contains mathematical expressions".into());
    }

    if !multipart.is_empty() {
        reasons.push("Contains multi-part question structure".into());
    }

    reasons.push(format!("Prompt length: {}", length.value));

    format!("Score {score}/100. {}", reasons.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shunt_types::SignalKind;

    fn analyzer() -> PromptAnalyzer {
        PromptAnalyzer::new()
    }

    fn kinds(analysis: &ComplexityAnalysis) -> Vec<SignalKind> {
        analysis.signals.iter().map(|s| s.kind).collect()
    }

    // ── Empty and trivial prompts ──────────────────────────────────

    #[test]
    fn empty_prompt_scores_zero() {
        let result = analyzer().analyze("");
        assert_eq!(result.score, 0);
        assert_eq!(result.level, ComplexityLevel::Low);
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
        assert!(result.signals.is_empty());
        assert_eq!(result.reasoning, "Empty prompt");
    }

    #[test]
    fn whitespace_prompt_scores_zero() {
        let result = analyzer().analyze("   \n\t  ");
        assert_eq!(result.score, 0);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn simple_question_is_low_complexity() {
        let result = analyzer().analyze("What is Python?");
        assert!(result.score < 30, "got {}", result.score);
        assert_eq!(result.level, ComplexityLevel::Low);
        assert!(!kinds(&result).contains(&SignalKind::CodeBlock));
        assert!(!kinds(&result).contains(&SignalKind::MathExpression));
    }

    // ── Signal families raise the score ────────────────────────────

    #[test]
    fn reasoning_keywords_raise_score() {
        let simple = analyzer().analyze("Tell me about Python");
        let hard = analyzer().analyze("Analyze and compare Python with Java step by step");
        assert!(hard.score > simple.score);
        assert_eq!(hard.level, ComplexityLevel::Medium);

        let values: Vec<&str> = hard.signals.iter().map(|s| s.value.as_str()).collect();
        assert!(values.contains(&"analyze"));
        assert!(values.contains(&"compare"));
        assert!(values.contains(&"step by step"));
    }

    #[test]
    fn code_blocks_detected_and_raise_score() {
        let prompt = "Fix this code:\n```python\ndef foo():\n    return bar\n```";
        let result = analyzer().analyze(prompt);
        assert!(kinds(&result).contains(&SignalKind::CodeBlock));

        let without = analyzer().analyze("Fix this code please");
        assert!(result.score > without.score);
    }

    #[test]
    fn math_detected_with_minimal_length_weight() {
        let result = analyzer().analyze("Solve: $x^2 + 2x + 1 = 0$");
        assert!(kinds(&result).contains(&SignalKind::MathExpression));

        let length = result
            .signals
            .iter()
            .find(|s| s.kind == SignalKind::Length)
            .unwrap();
        assert!((length.weight - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn multipart_questions_raise_score() {
        let single = analyzer().analyze("What is Python?");
        let multi = analyzer().analyze("1. What is Python? 2. How does it work? 3. Why use it?");
        assert!(multi.score > single.score);
    }

    #[test]
    fn stacked_signals_reach_high_complexity() {
        let result = analyzer().analyze(
            "Analyze step by step and compare the following:\n\
             ```python\ndef algorithm1(): pass\ndef algorithm2(): pass\n```\n\
             Calculate: $O(n) vs O(log n)$\n\
             1. Time complexity\n2. Space complexity\n3. Use cases",
        );
        assert_eq!(result.level, ComplexityLevel::High);
        assert!(result.score >= 70);
    }

    // ── Score properties ───────────────────────────────────────────

    #[test]
    fn score_always_in_range() {
        let prompts = [
            "",
            "Hi",
            "What is Python?",
            &"comprehensive analyze debug optimize ".repeat(50),
            &format!("```{}```", "x".repeat(5000)),
        ];
        for prompt in prompts {
            let result = analyzer().analyze(prompt);
            assert!(result.score <= 100);
            assert_eq!(result.level, ComplexityLevel::from_score(result.score));
        }
    }

    #[test]
    fn adding_signal_text_never_lowers_score() {
        let cases = [
            ("Tell me about dogs", " and analyze their behavior"),
            ("What is rust", " ```fn main() {}```"),
            ("Short question?", " Also, what is the probability?"),
        ];
        for (base, extra) in cases {
            let before = analyzer().analyze(base).score;
            let after = analyzer().analyze(&format!("{base}{extra}")).score;
            assert!(after >= before, "{base:?}: {after} < {before}");
        }
    }

    #[test]
    fn analysis_is_deterministic() {
        let prompt = "Analyze this: ```let x = 1;``` then 2 + 2, first A, finally B?";
        let a = serde_json::to_string(&analyzer().analyze(prompt)).unwrap();
        let b = serde_json::to_string(&analyzer().analyze(prompt)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn repeated_keyword_capped_by_diminishing_returns() {
        // One keyword repeated many times cannot push its category past the
        // single-signal contribution by much.
        let once = analyzer().analyze("analyze this").score;
        let many = analyzer().analyze(&"analyze this ".repeat(30)).score;
        // Dedup collapses identical values, so the only growth comes from
        // the length signal.
        assert!(many <= once + 10, "once={once} many={many}");
    }

    // ── Confidence ─────────────────────────────────────────────────

    #[test]
    fn clear_prompts_have_higher_confidence() {
        let clear = analyzer().analyze(
            "Analyze, compare, and evaluate these algorithms step by step:\n\
             ```python\ndef sort1(arr): pass\n```",
        );
        let ambiguous = analyzer().analyze("Hello there");
        assert!(clear.confidence > ambiguous.confidence);
    }

    #[test]
    fn confidence_rounded_to_two_decimals() {
        let result = analyzer().analyze("Explain how does this work");
        let scaled = result.confidence * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    // ── Reasoning text ─────────────────────────────────────────────

    #[test]
    fn reasoning_mentions_detected_families() {
        let result = analyzer().analyze("Analyze this code block: ```python pass```");
        assert!(result.reasoning.contains("reasoning keywords"));
        assert!(result.reasoning.contains("code block"));
        assert!(result.reasoning.starts_with(&format!("Score {}/100.", result.score)));
    }

    #[test]
    fn reasoning_lists_at_most_three_keywords() {
        let result =
            analyzer().analyze("analyze compare contrast evaluate assess design this system");
        let clause = result
            .reasoning
            .split(';')
            .find(|c| c.contains("reasoning keywords"))
            .unwrap();
        assert_eq!(clause.matches(',').count(), 2); // three values, two commas
    }

    #[test]
    fn reasoning_always_names_prompt_length() {
        let result = analyzer().analyze("Hi");
        assert!(result.reasoning.contains("Prompt length: 2 characters"));
    }

    // ── Weight overrides ───────────────────────────────────────────

    #[test]
    fn custom_weights_change_score() {
        let prompt = "Analyze this code: ```python pass```";
        let default_score = PromptAnalyzer::new().analyze(prompt).score;

        let heavy_keywords = PromptAnalyzer::with_weights(SignalWeights {
            keyword: 0.8,
            code: 0.05,
            ..SignalWeights::default()
        });
        let custom_score = heavy_keywords.analyze(prompt).score;
        assert_ne!(default_score, custom_score);
    }

    #[test]
    fn prompt_length_counted_in_chars() {
        let result = analyzer().analyze("日本語です");
        assert_eq!(result.prompt_length, 5);
    }
}
