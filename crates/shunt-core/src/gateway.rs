//! Per-request orchestration: route, generate, quality-gate, record.
//!
//! [`Gateway`] wires the routing engine, escalation controller, quality
//! checker, record builder and metrics sink into the full control flow for
//! one chat completion. It is transport-agnostic: HTTP servers, CLIs and
//! tests all call [`Gateway::chat`] the same way.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use shunt_llm::{Backend, BackendError, DeadlineBackend};
use shunt_types::{
    ChatResponse, ComplexityAnalysis, EscalationChain, Message, QualityAssessment, Role,
    RoutingDecision, Settings,
};

use crate::escalation::EscalationController;
use crate::metrics::{MetricsSink, RecordBuilder};
use crate::quality::QualityChecker;
use crate::routing::RoutingEngine;
use crate::routing::strategies::RoutingStrategy;

/// Errors surfaced to gateway callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request contained no user message to route on.
    #[error("no user message found in request")]
    NoUserMessage,

    /// The back-end failed; see the wrapped error for the taxonomy.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Per-request options supplied by the caller.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Use this model instead of the routed one.
    pub model: Option<String>,
    /// Skip the quality check even when routing asks for one.
    pub skip_quality_check: bool,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum output tokens, when bounded.
    pub max_tokens: Option<i64>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            model: None,
            skip_quality_check: false,
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

/// Everything a caller learns about one handled request.
#[derive(Debug, Clone)]
pub struct GatewayReply {
    /// The final response returned to the caller.
    pub response: ChatResponse,
    /// The model that produced it.
    pub final_model: String,
    /// Whether the request was escalated at least once.
    pub was_escalated: bool,
    /// Quality score of the final response, when a check ran.
    pub quality_score: Option<u8>,
    /// The complexity analysis of the routed prompt.
    pub analysis: ComplexityAnalysis,
    /// The routing decision that was applied.
    pub decision: RoutingDecision,
    /// The escalation chain, when the quality-gated path ran.
    pub chain: Option<EscalationChain>,
}

/// The gateway: one instance serves many concurrent requests.
///
/// All members are stateless or internally synchronized, so `&self` methods
/// can be called from any task.
pub struct Gateway {
    engine: RoutingEngine,
    controller: EscalationController,
    checker: QualityChecker,
    builder: RecordBuilder,
    sink: Arc<dyn MetricsSink>,
}

impl Gateway {
    /// Wire a gateway from settings, a back-end and a metrics sink.
    ///
    /// The back-end is wrapped with the configured per-attempt deadline, so
    /// a hung attempt surfaces as a timeout error instead of stalling the
    /// escalation loop.
    pub fn new(settings: Settings, backend: Arc<dyn Backend>, sink: Arc<dyn MetricsSink>) -> Self {
        let settings = settings.normalized();
        let backend: Arc<dyn Backend> =
            Arc::new(DeadlineBackend::new(backend, settings.llm_timeout_secs));
        let engine = RoutingEngine::new(settings.clone());
        let checker = QualityChecker::new(&settings);
        let controller =
            EscalationController::new(settings.clone(), backend, QualityChecker::new(&settings));
        let builder = RecordBuilder::new(settings);
        Self {
            engine,
            controller,
            checker,
            builder,
            sink,
        }
    }

    /// Change the routing strategy at runtime.
    pub fn set_strategy(&mut self, strategy: Box<dyn RoutingStrategy>) {
        self.engine.set_strategy(strategy);
    }

    /// Borrow the routing engine, e.g. for standalone analysis.
    pub fn engine(&self) -> &RoutingEngine {
        &self.engine
    }

    /// Borrow the escalation controller, e.g. for response combination.
    pub fn controller(&self) -> &EscalationController {
        &self.controller
    }

    /// Handle one chat completion.
    ///
    /// Routes on the last user message, generates (with escalation when the
    /// routing decision asks for a quality check), then delivers one metrics
    /// record to the sink. Sink failures are logged and swallowed; the
    /// reply to the caller is authoritative.
    pub async fn chat(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<GatewayReply, GatewayError> {
        let user_prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .ok_or(GatewayError::NoUserMessage)?;

        let (analysis, decision) = self.engine.route_with_analysis(&user_prompt);
        let model_to_use = options
            .model
            .clone()
            .unwrap_or_else(|| decision.selected_model.clone());

        let mut quality: Option<QualityAssessment> = None;
        let mut chain: Option<EscalationChain> = None;

        let (response, final_model, was_escalated, quality_score) =
            if decision.requires_quality_check && !options.skip_quality_check {
                let (response, esc_chain) = self
                    .controller
                    .handle_with_escalation(
                        messages,
                        &model_to_use,
                        analysis.score,
                        options.temperature,
                        options.max_tokens,
                    )
                    .await?;
                let final_model = esc_chain.final_model.clone();
                let was_escalated = esc_chain.total_attempts > 1;
                let quality_score = esc_chain.steps.last().map(|s| s.quality_score);
                chain = Some(esc_chain);
                (response, final_model, was_escalated, quality_score)
            } else {
                let response = self
                    .controller
                    .handle_direct(
                        messages,
                        &model_to_use,
                        options.temperature,
                        options.max_tokens,
                    )
                    .await?;
                // Advisory check for the record, even though nothing escalates.
                let assessment = self.checker.check(&response.content, analysis.score);
                let quality_score = Some(assessment.score);
                quality = Some(assessment);
                (response, model_to_use, false, quality_score)
            };

        let record = self.builder.build(
            &user_prompt,
            &analysis,
            &decision,
            &response,
            quality.as_ref(),
            chain.as_ref(),
            None,
        );
        if let Err(err) = self.sink.record(&record).await {
            warn!(
                request_id = %record.request_id,
                error = %err,
                "failed to deliver metrics record"
            );
        }

        Ok(GatewayReply {
            response,
            final_model,
            was_escalated,
            quality_score,
            analysis,
            decision,
            chain,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::metrics::{MemorySink, SinkError};
    use shunt_llm::GenerateRequest;
    use shunt_types::{ModelTier, RequestRecord, TokenUsage};

    const GOOD_ANSWER: &str = "Quantum entanglement links the states of two particles. \
        Measuring one determines the outcome for the other regardless of distance. \
        The effect cannot transmit information faster than light. It underpins \
        quantum key distribution and several error correction schemes.";

    const BAD_ANSWER: &str = "I cannot help with that.";

    struct ScriptedBackend {
        fast_reply: String,
        complex_reply: String,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(fast_reply: &str, complex_reply: &str) -> Self {
            Self {
                fast_reply: fast_reply.into(),
                complex_reply: complex_reply.into(),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<ChatResponse, BackendError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let content = if request.model.contains("thinking") {
                self.complex_reply.clone()
            } else {
                self.fast_reply.clone()
            };
            Ok(ChatResponse {
                id: format!("resp-{n}"),
                content,
                model: request.model.clone(),
                usage: TokenUsage {
                    prompt_tokens: 12,
                    completion_tokens: 34,
                    total_tokens: 46,
                },
                finish_reason: "stop".into(),
                created_at: Utc::now(),
                latency_ms: 250.0,
            })
        }
    }

    struct FailingSink;

    #[async_trait]
    impl MetricsSink for FailingSink {
        async fn record(&self, _record: &RequestRecord) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("database down".into()))
        }
    }

    fn gateway_with(
        backend: Arc<dyn Backend>,
        sink: Arc<dyn MetricsSink>,
    ) -> Gateway {
        Gateway::new(Settings::default(), backend, sink)
    }

    const BORDERLINE_PROMPT: &str = "Analyze and compare Python with Java step by step";

    #[tokio::test]
    async fn trivial_prompt_takes_direct_path() {
        let sink = Arc::new(MemorySink::new());
        let gw = gateway_with(
            Arc::new(ScriptedBackend::new(GOOD_ANSWER, GOOD_ANSWER)),
            sink.clone(),
        );

        let reply = gw
            .chat(&[Message::user("Hi")], &ChatOptions::default())
            .await
            .unwrap();

        assert_eq!(reply.final_model, "gemini-2.0-flash");
        assert!(!reply.was_escalated);
        assert!(reply.chain.is_none());
        // The advisory quality check still ran for the record.
        assert!(reply.quality_score.is_some());
        assert!(gw.engine().analyze("Hi").score < 30);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].initial_tier, ModelTier::Fast);
        assert!(!records[0].was_escalated);
    }

    #[tokio::test]
    async fn borderline_prompt_escalates_on_poor_quality() {
        let sink = Arc::new(MemorySink::new());
        let gw = gateway_with(
            Arc::new(ScriptedBackend::new(BAD_ANSWER, GOOD_ANSWER)),
            sink.clone(),
        );

        let reply = gw
            .chat(&[Message::user(BORDERLINE_PROMPT)], &ChatOptions::default())
            .await
            .unwrap();

        assert!(reply.was_escalated);
        assert_eq!(reply.final_model, "gemini-2.0-flash-thinking-exp");
        assert_eq!(reply.response.content, GOOD_ANSWER);
        let chain = reply.chain.unwrap();
        assert_eq!(chain.total_attempts, 2);

        let combined = gw.controller().combine_responses(&chain);
        assert_eq!(combined.strategy_label, "use_latest");
        assert_eq!(combined.models_used.len(), 2);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].was_escalated);
        assert_eq!(records[0].escalation_depth, 1);
        assert_eq!(records[0].final_model, "gemini-2.0-flash-thinking-exp");
    }

    #[tokio::test]
    async fn skip_quality_check_forces_direct_path() {
        let sink = Arc::new(MemorySink::new());
        let gw = gateway_with(
            Arc::new(ScriptedBackend::new(BAD_ANSWER, GOOD_ANSWER)),
            sink.clone(),
        );

        let options = ChatOptions {
            skip_quality_check: true,
            ..ChatOptions::default()
        };
        let reply = gw
            .chat(&[Message::user(BORDERLINE_PROMPT)], &options)
            .await
            .unwrap();

        assert!(!reply.was_escalated);
        assert!(reply.chain.is_none());
        assert_eq!(reply.response.content, BAD_ANSWER);
    }

    #[tokio::test]
    async fn model_override_wins_over_routing() {
        let sink = Arc::new(MemorySink::new());
        let gw = gateway_with(
            Arc::new(ScriptedBackend::new(GOOD_ANSWER, GOOD_ANSWER)),
            sink.clone(),
        );

        let options = ChatOptions {
            model: Some("gemini-2.0-flash-thinking-exp".into()),
            ..ChatOptions::default()
        };
        let reply = gw
            .chat(&[Message::user("Hi")], &options)
            .await
            .unwrap();

        assert_eq!(reply.response.model, "gemini-2.0-flash-thinking-exp");
        assert_eq!(reply.final_model, "gemini-2.0-flash-thinking-exp");
    }

    #[tokio::test]
    async fn routes_on_last_user_message() {
        let sink = Arc::new(MemorySink::new());
        let gw = gateway_with(
            Arc::new(ScriptedBackend::new(GOOD_ANSWER, GOOD_ANSWER)),
            sink.clone(),
        );

        let messages = vec![
            Message::system("You are terse."),
            Message::user("Hi"),
            Message::assistant("Hello."),
            Message::user("Thanks"),
        ];
        let reply = gw.chat(&messages, &ChatOptions::default()).await.unwrap();
        assert_eq!(reply.analysis.prompt_length, "Thanks".chars().count());

        let records = sink.records();
        assert_eq!(records[0].prompt_preview, "Thanks");
    }

    #[tokio::test]
    async fn no_user_message_is_an_error() {
        let gw = gateway_with(
            Arc::new(ScriptedBackend::new(GOOD_ANSWER, GOOD_ANSWER)),
            Arc::new(MemorySink::new()),
        );

        let err = gw
            .chat(&[Message::system("only system")], &ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NoUserMessage));
    }

    #[tokio::test]
    async fn sink_failure_does_not_fail_request() {
        let gw = gateway_with(
            Arc::new(ScriptedBackend::new(GOOD_ANSWER, GOOD_ANSWER)),
            Arc::new(FailingSink),
        );

        let reply = gw
            .chat(&[Message::user("Hi")], &ChatOptions::default())
            .await
            .unwrap();
        assert_eq!(reply.response.content, GOOD_ANSWER);
    }

    #[tokio::test]
    async fn backend_error_propagates_and_skips_record() {
        struct RateLimitedBackend;

        #[async_trait]
        impl Backend for RateLimitedBackend {
            fn name(&self) -> &str {
                "limited"
            }
            async fn generate(
                &self,
                request: &GenerateRequest,
            ) -> Result<ChatResponse, BackendError> {
                Err(BackendError::RateLimited {
                    model: request.model.clone(),
                    retry_after_secs: Some(1.0),
                })
            }
        }

        let sink = Arc::new(MemorySink::new());
        let gw = gateway_with(Arc::new(RateLimitedBackend), sink.clone());

        let err = gw
            .chat(&[Message::user("Hi")], &ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Backend(BackendError::RateLimited { .. })
        ));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn hung_backend_surfaces_as_timeout() {
        struct HungBackend;

        #[async_trait]
        impl Backend for HungBackend {
            fn name(&self) -> &str {
                "hung"
            }
            async fn generate(
                &self,
                request: &GenerateRequest,
            ) -> Result<ChatResponse, BackendError> {
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                Err(BackendError::Other {
                    model: Some(request.model.clone()),
                    message: "unreachable".into(),
                })
            }
        }

        let mut settings = Settings::default();
        settings.llm_timeout_secs = 0.01;
        let gw = Gateway::new(settings, Arc::new(HungBackend), Arc::new(MemorySink::new()));

        let err = gw
            .chat(&[Message::user("Hi")], &ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Backend(BackendError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn strategy_swap_changes_gateway_routing() {
        let sink = Arc::new(MemorySink::new());
        let mut gw = gateway_with(
            Arc::new(ScriptedBackend::new(GOOD_ANSWER, GOOD_ANSWER)),
            sink.clone(),
        );
        gw.set_strategy(Box::new(
            crate::routing::strategies::AlwaysComplexStrategy,
        ));

        let reply = gw
            .chat(&[Message::user("Hi")], &ChatOptions::default())
            .await
            .unwrap();
        assert_eq!(reply.final_model, "gemini-2.0-flash-thinking-exp");
        assert_eq!(reply.decision.tier, ModelTier::Complex);
    }
}
