//! Quality issue detection: stateless scans producing [`QualityIssue`]s.
//!
//! Every detector is total. Regex catalogue entries that fail to compile
//! are dropped at construction; scanning never fails.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use shunt_types::{QualityIssue, QualityIssueKind, tail_chars, truncate_chars};

/// Hedging phrases. The optional second element is a forbidden suffix:
/// "i think that X" is an ordinary assertion, not a hedge.
const UNCERTAINTY_PATTERNS: &[(&str, Option<&str>)] = &[
    (r"i'?m not (?:entirely |completely |fully )?sure", None),
    (r"i'?m not certain", None),
    (r"i'?m uncertain", None),
    (r"might be", None),
    (r"may be", None),
    (r"\bmaybe\b", None),
    (r"possibly", None),
    (r"perhaps", None),
    (r"i think", Some(" that")),
    (r"i believe", Some(" that")),
    (r"it seems like", None),
    (r"it appears (?:to be |that )", None),
    (r"could be", None),
    (r"probably", None),
    (r"not 100% sure", None),
    (r"hard to say", None),
    (r"difficult to determine", None),
    (r"i don'?t (?:really )?know", None),
    (r"(?:this|that) is (?:just )?(?:a |my )?guess", None),
    (r"if i had to guess", None),
    (r"take this with a grain of salt", None),
];

/// End-of-text markers of a response that was cut off.
const INCOMPLETE_PATTERNS: &[&str] = &[
    r"\.\.\.\s*$",
    r"…\s*$",
    r"(?:etc|and so on|and more|and others)\s*\.?\s*$",
    r":\s*$",
    r"\d+\.\s*$",
    r"(?:First|1\.)[^.]*$",
    r"to be continued",
    r"i'll continue",
    r"let me know if you.{0,30}$",
];

/// Phrases declaring inability to complete the task.
const FAILED_REASONING_PATTERNS: &[&str] = &[
    r"i cannot (?:help|assist|provide|answer)",
    r"i am unable to",
    r"i'?m unable to",
    r"i don'?t have (?:the |enough )?(?:ability|capability|information|access)",
    r"(?:this|that) is (?:beyond|outside) (?:my|the) (?:capabilities|scope|knowledge)",
    r"i apologize.{0,50}cannot",
    r"i'?m sorry.{0,30}(?:cannot|can't|unable)",
    r"unfortunately.{0,30}(?:cannot|can't|unable)",
    r"i'?m not able to",
    r"i don'?t know",
];

/// Explicit declinations.
const REFUSAL_PATTERNS: &[&str] = &[
    r"i (?:cannot|can't|won't|will not) (?:help|assist) with (?:that|this)",
    r"(?:this|that) (?:request|question) (?:is|seems) (?:inappropriate|harmful)",
    r"i'?m not (?:going to|able to) (?:help|assist) with",
    r"(?:that's|this is) not something i can",
    r"i have to decline",
    r"i must refuse",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| RegexBuilder::new(p).case_insensitive(true).build().ok())
        .collect()
}

/// Compiled pattern sets for the six response quality scans.
pub(crate) struct QualityDetectors {
    uncertainty: Vec<(Regex, Option<&'static str>)>,
    incomplete: Vec<Regex>,
    failed_reasoning: Vec<Regex>,
    refusal: Vec<Regex>,
}

impl QualityDetectors {
    pub(crate) fn new() -> Self {
        Self {
            uncertainty: UNCERTAINTY_PATTERNS
                .iter()
                .filter_map(|(p, forbid)| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .ok()
                        .map(|re| (re, *forbid))
                })
                .collect(),
            incomplete: compile(INCOMPLETE_PATTERNS),
            failed_reasoning: compile(FAILED_REASONING_PATTERNS),
            refusal: compile(REFUSAL_PATTERNS),
        }
    }

    /// Detect hedging. Emits at most one issue whose severity grows with
    /// the number of matches, capped at 0.8.
    pub(crate) fn uncertainty(&self, text: &str) -> Vec<QualityIssue> {
        let lower = text.to_lowercase();

        let mut matches: Vec<&str> = Vec::new();
        for (pattern, forbid) in &self.uncertainty {
            for m in pattern.find_iter(&lower) {
                if let Some(suffix) = forbid
                    && lower[m.end()..].starts_with(suffix)
                {
                    continue;
                }
                matches.push(m.as_str());
            }
        }

        if matches.is_empty() {
            return Vec::new();
        }

        let severity = (0.2 * matches.len() as f64).min(0.8);
        vec![QualityIssue {
            kind: QualityIssueKind::Uncertainty,
            description: format!("Found {} uncertainty phrase(s)", matches.len()),
            severity,
            evidence: Some(truncate_chars(matches[0], 50)),
        }]
    }

    /// Detect cut-off responses. The first matching marker is enough.
    pub(crate) fn incomplete(&self, text: &str) -> Vec<QualityIssue> {
        for pattern in &self.incomplete {
            if pattern.is_match(text) {
                let evidence = tail_chars(text, 100).trim().to_string();
                return vec![QualityIssue {
                    kind: QualityIssueKind::Incomplete,
                    description: "Response appears to be incomplete".into(),
                    severity: 0.7,
                    evidence: Some(evidence),
                }];
            }
        }
        Vec::new()
    }

    /// Detect declarations of inability. First match wins.
    pub(crate) fn failed_reasoning(&self, text: &str) -> Vec<QualityIssue> {
        let lower = text.to_lowercase();
        for pattern in &self.failed_reasoning {
            if let Some(m) = pattern.find(&lower) {
                return vec![QualityIssue {
                    kind: QualityIssueKind::FailedReasoning,
                    description: "Response indicates inability to complete task".into(),
                    severity: 0.9,
                    evidence: Some(truncate_chars(m.as_str(), 50)),
                }];
            }
        }
        Vec::new()
    }

    /// Detect explicit refusals. First match wins; refusal is the highest
    /// severity defect.
    pub(crate) fn refusal(&self, text: &str) -> Vec<QualityIssue> {
        let lower = text.to_lowercase();
        for pattern in &self.refusal {
            if let Some(m) = pattern.find(&lower) {
                return vec![QualityIssue {
                    kind: QualityIssueKind::Refusal,
                    description: "Model refused to answer the request".into(),
                    severity: 1.0,
                    evidence: Some(truncate_chars(m.as_str(), 50)),
                }];
            }
        }
        Vec::new()
    }
}

/// Detect responses shorter than the prompt complexity warrants.
///
/// The expected minimum grows with complexity: a score-80 prompt deserves
/// more than a one-liner.
pub(crate) fn too_short(
    text: &str,
    min_length: usize,
    prompt_complexity: u8,
) -> Vec<QualityIssue> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    let expected = min_length + usize::from(prompt_complexity) * 2;

    if len >= expected {
        return Vec::new();
    }

    let severity = (1.0 - len as f64 / expected as f64).max(0.3).min(0.7);
    vec![QualityIssue {
        kind: QualityIssueKind::TooShort,
        description: format!("Response is only {len} characters (expected >{expected})"),
        severity,
        evidence: Some(if trimmed.is_empty() {
            "(empty)".into()
        } else {
            truncate_chars(trimmed, 100)
        }),
    }]
}

/// Detect excessive repetition: repeated sentences, then repeated 3-word
/// phrases.
pub(crate) fn repetition(text: &str) -> Vec<QualityIssue> {
    let mut issues = Vec::new();

    let sentences: Vec<String> = text
        .split(['.', '!', '?'])
        .map(|s| s.trim().to_lowercase())
        .filter(|s| s.chars().count() > 10)
        .collect();

    if sentences.len() >= 3 {
        let unique: HashSet<&String> = sentences.iter().collect();
        let ratio = 1.0 - unique.len() as f64 / sentences.len() as f64;

        if ratio > 0.3 {
            issues.push(QualityIssue {
                kind: QualityIssueKind::Repetition,
                description: format!("High repetition ratio: {:.0}%", ratio * 100.0),
                severity: ratio.min(0.8),
                evidence: None,
            });
        }
    }

    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.len() > 10 {
        for i in 0..words.len() - 6 {
            let phrase = words[i..i + 3].join(" ");
            let rest = words[i + 3..].join(" ");
            if rest.contains(&phrase) {
                if issues.is_empty() {
                    issues.push(QualityIssue {
                        kind: QualityIssueKind::Repetition,
                        description: "Contains repeated phrases".into(),
                        severity: 0.5,
                        evidence: Some(phrase),
                    });
                }
                break;
            }
        }
    }

    issues
}
