//! Metrics record building and the sink interface.
//!
//! [`RecordBuilder`] is a pure transformer: given everything the request
//! pipeline produced, it shapes one immutable [`RequestRecord`]. The
//! [`MetricsSink`] consumes records; persistence and aggregation belong to
//! the sink's implementor. Sink failures never fail a request.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use shunt_types::{
    ChatResponse, Clock, ComplexityAnalysis, EscalationChain, IdGenerator, ModelTier,
    QualityAssessment, RequestRecord, RoutingDecision, Settings, SystemClock, TokenUsage,
    UuidIdGenerator, truncate_chars,
};

/// Errors a metrics sink may report.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink's backing store is unreachable.
    #[error("metrics sink unavailable: {0}")]
    Unavailable(String),

    /// The record could not be written.
    #[error("metrics write failed: {0}")]
    Write(String),
}

/// Consumer of per-request audit records.
///
/// Write failures are the sink's problem: callers observe the returned
/// error, log it at warning level, and carry on. The reply to the end
/// caller is authoritative.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Consume one record.
    async fn record(&self, record: &RequestRecord) -> Result<(), SinkError>;
}

/// In-memory sink for tests and offline tooling.
#[derive(Default)]
pub struct MemorySink {
    records: RwLock<Vec<RequestRecord>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records received so far.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// True when no records have been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all received records.
    pub fn records(&self) -> Vec<RequestRecord> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MetricsSink for MemorySink {
    async fn record(&self, record: &RequestRecord) -> Result<(), SinkError> {
        self.records
            .write()
            .map_err(|e| SinkError::Write(e.to_string()))?
            .push(record.clone());
        Ok(())
    }
}

/// Whether a model is billed at the flash tier.
///
/// Flash-tier names contain "flash" without "thinking"; everything else is
/// billed at the pro tier.
pub fn is_flash_model(model: &str) -> bool {
    let lower = model.to_lowercase();
    lower.contains("flash") && !lower.contains("thinking")
}

/// Shapes [`RequestRecord`]s from the outputs of the request pipeline.
pub struct RecordBuilder {
    settings: Settings,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl RecordBuilder {
    /// Create a builder with the system clock and UUID ids.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIdGenerator),
        }
    }

    /// Replace the clock, e.g. for deterministic tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the id source, e.g. for deterministic tests.
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Estimated cost in USD for `usage` billed against `model`.
    ///
    /// Linear in each token count: `prompt_tokens * input_rate / 1e6 +
    /// completion_tokens * output_rate / 1e6`, with rates chosen by tier.
    pub fn estimated_cost(&self, model: &str, usage: &TokenUsage) -> f64 {
        let (input_rate, output_rate) = if is_flash_model(model) {
            (self.settings.cost_flash_input, self.settings.cost_flash_output)
        } else {
            (self.settings.cost_pro_input, self.settings.cost_pro_output)
        };

        usage.prompt_tokens as f64 / 1_000_000.0 * input_rate
            + usage.completion_tokens as f64 / 1_000_000.0 * output_rate
    }

    /// Build the immutable record for one completed request.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        &self,
        prompt: &str,
        analysis: &ComplexityAnalysis,
        decision: &RoutingDecision,
        response: &ChatResponse,
        quality: Option<&QualityAssessment>,
        chain: Option<&EscalationChain>,
        error: Option<&str>,
    ) -> RequestRecord {
        let was_escalated = chain.is_some_and(|c| c.total_attempts > 1);
        let escalation_depth = chain.map_or(0, |c| c.total_attempts.saturating_sub(1));
        let final_model = chain.map_or_else(
            || decision.selected_model.clone(),
            |c| c.final_model.clone(),
        );
        let total_latency_ms = chain.map_or(response.latency_ms, |c| c.total_latency_ms);

        let initial_tier = if is_flash_model(&decision.selected_model) {
            ModelTier::Fast
        } else {
            ModelTier::Complex
        };

        let escalation_reason = quality.and_then(|q| {
            if q.should_escalate {
                q.escalation_reason.clone()
            } else {
                None
            }
        });

        let now = self.clock.now();

        RequestRecord {
            request_id: format!("req-{}", self.ids.hex_id(12)),
            created_at: now,
            completed_at: now,
            prompt_preview: truncate_chars(prompt, 500),
            prompt_length: prompt.chars().count(),
            complexity_score: analysis.score,
            complexity_confidence: analysis.confidence,
            detected_signals: analysis
                .signals
                .iter()
                .map(|s| s.kind.as_str().to_string())
                .collect(),
            initial_model: decision.selected_model.clone(),
            initial_tier,
            routing_reasoning: decision.reasoning.clone(),
            quality_score: quality.map(|q| q.score),
            was_escalated,
            escalation_depth,
            escalation_reason,
            latency_ms: response.latency_ms,
            total_latency_ms,
            prompt_tokens: response.usage.prompt_tokens,
            completion_tokens: response.usage.completion_tokens,
            total_tokens: response.usage.total_tokens,
            estimated_cost: self.estimated_cost(&final_model, &response.usage),
            final_model,
            response_preview: if response.content.is_empty() {
                None
            } else {
                Some(truncate_chars(&response.content, 500))
            },
            finish_reason: response.finish_reason.clone(),
            error_occurred: error.is_some(),
            error_message: error.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use shunt_types::{ComplexityLevel, EscalationStep};

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        }
    }

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn hex_id(&self, len: usize) -> String {
            "a".repeat(len)
        }
    }

    fn builder() -> RecordBuilder {
        RecordBuilder::new(Settings::default())
            .with_clock(Arc::new(FixedClock))
            .with_ids(Arc::new(FixedIds))
    }

    fn analysis() -> ComplexityAnalysis {
        ComplexityAnalysis {
            score: 55,
            confidence: 0.7,
            level: ComplexityLevel::Medium,
            signals: Vec::new(),
            prompt_length: 20,
            reasoning: "Score 55/100. Prompt length: 20 characters".into(),
        }
    }

    fn decision(model: &str, tier: ModelTier) -> RoutingDecision {
        RoutingDecision {
            selected_model: model.into(),
            tier,
            complexity_score: 55,
            confidence: 0.7,
            reasoning: "Medium complexity (55) - using fast model with quality check".into(),
            requires_quality_check: true,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    fn response(model: &str) -> ChatResponse {
        ChatResponse {
            id: "resp-1".into(),
            content: "The answer is 42.".into(),
            model: model.into(),
            usage: TokenUsage {
                prompt_tokens: 1_000_000,
                completion_tokens: 1_000_000,
                total_tokens: 2_000_000,
            },
            finish_reason: "stop".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            latency_ms: 450.0,
        }
    }

    fn chain(final_model: &str, attempts: usize) -> EscalationChain {
        let steps: Vec<EscalationStep> = (0..attempts)
            .map(|i| EscalationStep {
                model_used: if i + 1 == attempts {
                    final_model.into()
                } else {
                    "gemini-2.0-flash".into()
                },
                response_preview: "...".into(),
                quality_score: 50,
                escalated: i + 1 < attempts,
                latency_ms: 100.0,
                timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            })
            .collect();
        EscalationChain {
            request_id: "req-00000000".into(),
            original_prompt_preview: "...".into(),
            final_model: final_model.into(),
            final_response: "The answer is 42.".into(),
            total_attempts: steps.len(),
            total_latency_ms: 100.0 * attempts as f64,
            escalation_prevented_loop: false,
            steps,
        }
    }

    // ── Tier and cost ──────────────────────────────────────────────

    #[test]
    fn flash_models_billed_at_flash_rates() {
        assert!(is_flash_model("gemini-2.0-flash"));
        assert!(is_flash_model("GEMINI-2.0-FLASH"));
        assert!(!is_flash_model("gemini-2.0-flash-thinking-exp"));
        assert!(!is_flash_model("gemini-2.0-pro"));
    }

    #[test]
    fn cost_uses_flash_rates_for_flash_model() {
        let b = builder();
        let usage = TokenUsage {
            prompt_tokens: 1_000_000,
            completion_tokens: 1_000_000,
            total_tokens: 2_000_000,
        };
        let cost = b.estimated_cost("gemini-2.0-flash", &usage);
        assert!((cost - (0.075 + 0.30)).abs() < 1e-9);
    }

    #[test]
    fn cost_uses_pro_rates_for_thinking_model() {
        let b = builder();
        let usage = TokenUsage {
            prompt_tokens: 1_000_000,
            completion_tokens: 1_000_000,
            total_tokens: 2_000_000,
        };
        let cost = b.estimated_cost("gemini-2.0-flash-thinking-exp", &usage);
        assert!((cost - (1.25 + 5.00)).abs() < 1e-9);
    }

    #[test]
    fn cost_is_linear_in_token_counts() {
        let b = builder();
        let base = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 200,
            total_tokens: 300,
        };
        let doubled = TokenUsage {
            prompt_tokens: 200,
            completion_tokens: 400,
            total_tokens: 600,
        };
        let model = "gemini-2.0-flash";
        assert!(
            (2.0 * b.estimated_cost(model, &base) - b.estimated_cost(model, &doubled)).abs()
                < 1e-12
        );
    }

    // ── Record shaping ─────────────────────────────────────────────

    #[test]
    fn direct_request_record() {
        let b = builder();
        let record = b.build(
            "What is Python?",
            &analysis(),
            &decision("gemini-2.0-flash", ModelTier::Fast),
            &response("gemini-2.0-flash"),
            None,
            None,
            None,
        );

        assert_eq!(record.request_id, "req-aaaaaaaaaaaa");
        assert_eq!(record.initial_model, "gemini-2.0-flash");
        assert_eq!(record.initial_tier, ModelTier::Fast);
        assert_eq!(record.final_model, "gemini-2.0-flash");
        assert!(!record.was_escalated);
        assert_eq!(record.escalation_depth, 0);
        assert!((record.total_latency_ms - 450.0).abs() < f64::EPSILON);
        assert!(record.quality_score.is_none());
        assert!(!record.error_occurred);
    }

    #[test]
    fn escalated_request_record_uses_chain_values() {
        let b = builder();
        let c = chain("gemini-2.0-flash-thinking-exp", 2);
        let record = b.build(
            "Analyze this tricky question",
            &analysis(),
            &decision("gemini-2.0-flash", ModelTier::Fast),
            &response("gemini-2.0-flash-thinking-exp"),
            None,
            Some(&c),
            None,
        );

        assert!(record.was_escalated);
        assert_eq!(record.escalation_depth, 1);
        assert_eq!(record.final_model, "gemini-2.0-flash-thinking-exp");
        assert!((record.total_latency_ms - 200.0).abs() < f64::EPSILON);
        // Cost follows the final (pro-tier) model.
        assert!((record.estimated_cost - (1.25 + 5.00)).abs() < 1e-9);
    }

    #[test]
    fn single_attempt_chain_is_not_escalated() {
        let b = builder();
        let c = chain("gemini-2.0-flash", 1);
        let record = b.build(
            "prompt",
            &analysis(),
            &decision("gemini-2.0-flash", ModelTier::Fast),
            &response("gemini-2.0-flash"),
            None,
            Some(&c),
            None,
        );
        assert!(!record.was_escalated);
        assert_eq!(record.escalation_depth, 0);
    }

    #[test]
    fn escalation_reason_only_kept_when_escalating() {
        let b = builder();
        let escalating = QualityAssessment {
            score: 40,
            issues: Vec::new(),
            should_escalate: true,
            escalation_reason: Some("Quality score 40 below threshold (60)".into()),
            confidence: 0.8,
        };
        let fine = QualityAssessment {
            score: 90,
            issues: Vec::new(),
            should_escalate: false,
            escalation_reason: None,
            confidence: 0.8,
        };

        let d = decision("gemini-2.0-flash", ModelTier::Fast);
        let r = response("gemini-2.0-flash");
        let record = b.build("p", &analysis(), &d, &r, Some(&escalating), None, None);
        assert!(record.escalation_reason.is_some());
        assert_eq!(record.quality_score, Some(40));

        let record = b.build("p", &analysis(), &d, &r, Some(&fine), None, None);
        assert!(record.escalation_reason.is_none());
        assert_eq!(record.quality_score, Some(90));
    }

    #[test]
    fn previews_truncated_to_500_chars() {
        let b = builder();
        let long_prompt = "p".repeat(900);
        let mut long_response = response("gemini-2.0-flash");
        long_response.content = "r".repeat(900);

        let record = b.build(
            &long_prompt,
            &analysis(),
            &decision("gemini-2.0-flash", ModelTier::Fast),
            &long_response,
            None,
            None,
            None,
        );

        assert_eq!(record.prompt_preview.chars().count(), 500);
        assert_eq!(record.prompt_length, 900);
        assert_eq!(record.response_preview.unwrap().chars().count(), 500);
    }

    #[test]
    fn error_fields_round_trip() {
        let b = builder();
        let record = b.build(
            "p",
            &analysis(),
            &decision("gemini-2.0-flash", ModelTier::Fast),
            &response("gemini-2.0-flash"),
            None,
            None,
            Some("rate limit exceeded for gemini-2.0-flash"),
        );
        assert!(record.error_occurred);
        assert_eq!(
            record.error_message.as_deref(),
            Some("rate limit exceeded for gemini-2.0-flash")
        );
    }

    // ── MemorySink ─────────────────────────────────────────────────

    #[tokio::test]
    async fn memory_sink_stores_records() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        let b = builder();
        let record = b.build(
            "p",
            &analysis(),
            &decision("gemini-2.0-flash", ModelTier::Fast),
            &response("gemini-2.0-flash"),
            None,
            None,
            None,
        );
        sink.record(&record).await.unwrap();
        sink.record(&record).await.unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records()[0].request_id, "req-aaaaaaaaaaaa");
    }
}
