//! Signal detection: stateless scans producing [`DetectedSignal`]s.
//!
//! Each detector is total: regex catalogue entries that fail to compile are
//! skipped at construction, and scanning never fails. Detector output
//! preserves left-to-right scan order within each catalogue entry.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use shunt_types::{DetectedSignal, SignalKind, preview};

use super::catalog;

/// Compile a pattern catalogue, silently dropping entries that fail.
fn compile(patterns: &[&str], multi_line: bool) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .multi_line(multi_line)
                .build()
                .ok()
        })
        .collect()
}

/// Character offset of a byte index into `text`.
fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

/// Compiled pattern sets for the three regex-driven signal categories.
pub(crate) struct SignalDetectors {
    code: Vec<Regex>,
    math: Vec<Regex>,
    multipart: Vec<Regex>,
}

impl SignalDetectors {
    pub(crate) fn new() -> Self {
        Self {
            code: compile(catalog::CODE_PATTERNS, true),
            math: compile(catalog::MATH_PATTERNS, false),
            multipart: compile(catalog::MULTIPART_PATTERNS, true),
        }
    }

    /// Detect reasoning keywords: case-insensitive literal matches across
    /// the three weight tiers. All occurrences are reported.
    pub(crate) fn reasoning_keywords(&self, text: &str) -> Vec<DetectedSignal> {
        let lower = text.to_lowercase();
        let tiers = [
            (catalog::HIGH_REASONING_KEYWORDS, catalog::KEYWORD_WEIGHT_HIGH),
            (
                catalog::MEDIUM_REASONING_KEYWORDS,
                catalog::KEYWORD_WEIGHT_MEDIUM,
            ),
            (catalog::LOW_REASONING_KEYWORDS, catalog::KEYWORD_WEIGHT_LOW),
        ];

        let mut signals = Vec::new();
        for (keywords, weight) in tiers {
            for keyword in keywords {
                for (idx, _) in lower.match_indices(keyword) {
                    signals.push(DetectedSignal {
                        kind: SignalKind::ReasoningKeyword,
                        value: (*keyword).to_string(),
                        weight,
                        position: Some(char_offset(&lower, idx)),
                    });
                }
            }
        }
        signals
    }

    /// Detect code fences, inline code and programming constructs.
    pub(crate) fn code_blocks(&self, text: &str) -> Vec<DetectedSignal> {
        self.scan(
            &self.code,
            text,
            SignalKind::CodeBlock,
            catalog::CODE_SIGNAL_WEIGHT,
            50,
            false,
        )
    }

    /// Detect LaTeX notation, arithmetic and math vocabulary.
    pub(crate) fn math_expressions(&self, text: &str) -> Vec<DetectedSignal> {
        self.scan(
            &self.math,
            text,
            SignalKind::MathExpression,
            catalog::MATH_SIGNAL_WEIGHT,
            30,
            false,
        )
    }

    /// Detect list markers, enumeration adverbs and stacked questions.
    pub(crate) fn multipart_questions(&self, text: &str) -> Vec<DetectedSignal> {
        self.scan(
            &self.multipart,
            text,
            SignalKind::MultipartQuestion,
            catalog::MULTIPART_SIGNAL_WEIGHT,
            30,
            true,
        )
    }

    fn scan(
        &self,
        patterns: &[Regex],
        text: &str,
        kind: SignalKind,
        weight: f64,
        max_value_chars: usize,
        trim_value: bool,
    ) -> Vec<DetectedSignal> {
        let mut signals = Vec::new();
        for pattern in patterns {
            for m in pattern.find_iter(text) {
                let matched = if trim_value {
                    m.as_str().trim()
                } else {
                    m.as_str()
                };
                signals.push(DetectedSignal {
                    kind,
                    value: preview(matched, max_value_chars),
                    weight,
                    position: Some(char_offset(text, m.start())),
                });
            }
        }
        signals
    }
}

/// Compute the single length-derived signal for a prompt.
pub(crate) fn length_signal(text: &str) -> DetectedSignal {
    let length = text.chars().count();

    let weight = if length < catalog::LENGTH_VERY_SHORT {
        0.1
    } else if length < catalog::LENGTH_SHORT {
        0.2
    } else if length < catalog::LENGTH_MEDIUM {
        0.4
    } else if length < catalog::LENGTH_LONG {
        0.6
    } else if length < catalog::LENGTH_VERY_LONG {
        0.8
    } else {
        (0.8 + (length - catalog::LENGTH_VERY_LONG) as f64 / 10_000.0).min(0.9)
    };

    DetectedSignal {
        kind: SignalKind::Length,
        value: format!("{length} characters"),
        weight,
        position: None,
    }
}

/// Remove duplicate signals within a category.
///
/// For equal `(kind, lowercase value)` the first occurrence is kept unless a
/// later one carries strictly higher weight. Input order is preserved.
pub(crate) fn deduplicate(signals: Vec<DetectedSignal>) -> Vec<DetectedSignal> {
    let mut order: Vec<(SignalKind, String)> = Vec::new();
    let mut best: HashMap<(SignalKind, String), DetectedSignal> = HashMap::new();

    for signal in signals {
        let key = (signal.kind, signal.value.to_lowercase());
        match best.get(&key) {
            Some(existing) if existing.weight >= signal.weight => {}
            Some(_) => {
                best.insert(key, signal);
            }
            None => {
                order.push(key.clone());
                best.insert(key, signal);
            }
        }
    }

    order.into_iter().filter_map(|k| best.remove(&k)).collect()
}
