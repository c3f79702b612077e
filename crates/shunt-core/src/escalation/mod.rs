//! Quality-gated escalation.
//!
//! [`EscalationController`] drives the bounded retry loop: generate on the
//! current model, quality-check the output, and re-issue against the
//! complex model while quality stays below threshold, up to the configured
//! depth. Every attempt is recorded in an [`EscalationChain`].
//!
//! The controller holds no cross-request state; each invocation owns its
//! own chain, and within one request the loop is strictly sequential.
//! Back-end errors are never recovered: the first error ends the loop and
//! propagates with the partial chain discarded. Cancellation behaves the
//! same way -- dropping the returned future abandons the current attempt
//! without recording a step.

pub mod combine;

use std::sync::Arc;

use tracing::debug;

use shunt_llm::{Backend, BackendError, GenerateRequest};
use shunt_types::{
    ChatResponse, Clock, CombinedResponse, EscalationChain, EscalationStep, IdGenerator, Message,
    Settings, SystemClock, UuidIdGenerator, preview,
};

use crate::quality::QualityChecker;
use self::combine::{CombineStrategy, UseLatest};

/// Bounded retry state machine for quality-gated escalation.
///
/// # Example
///
/// ```rust,ignore
/// use shunt_core::EscalationController;
///
/// let controller = EscalationController::new(settings, backend, checker);
/// let (response, chain) = controller
///     .handle_with_escalation(&messages, "gemini-2.0-flash", 55, 0.7, None)
///     .await?;
/// if chain.total_attempts > 1 {
///     println!("escalated {} time(s)", chain.total_attempts - 1);
/// }
/// ```
pub struct EscalationController {
    settings: Settings,
    backend: Arc<dyn Backend>,
    checker: QualityChecker,
    combiner: Box<dyn CombineStrategy>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl EscalationController {
    /// Create a controller with the default combination strategy.
    pub fn new(settings: Settings, backend: Arc<dyn Backend>, checker: QualityChecker) -> Self {
        Self {
            settings: settings.normalized(),
            backend,
            checker,
            combiner: Box::new(UseLatest),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIdGenerator),
        }
    }

    /// Replace the response combination strategy.
    pub fn with_combiner(mut self, combiner: Box<dyn CombineStrategy>) -> Self {
        self.combiner = combiner;
        self
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

    /// Handle a request with automatic escalation on poor quality.
    ///
    /// Runs at most `max_escalation_depth + 1` attempts. Returns the last
    /// response received together with the complete per-step chain.
    ///
    /// # Errors
    ///
    /// The first back-end error terminates the loop and propagates
    /// unchanged; the failing attempt records no step.
    pub async fn handle_with_escalation(
        &self,
        messages: &[Message],
        initial_model: &str,
        complexity_score: u8,
        temperature: f64,
        max_tokens: Option<i64>,
    ) -> Result<(ChatResponse, EscalationChain), BackendError> {
        let max_depth = usize::from(self.settings.max_escalation_depth);
        let request_id = format!("req-{}", self.ids.hex_id(8));
        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        let prompt_preview = preview(prompt, 200);

        let mut steps: Vec<EscalationStep> = Vec::new();
        let mut total_latency_ms = 0.0;
        let mut current_model = initial_model.to_string();
        let mut attempt = 0usize;

        let (response, loop_prevented) = loop {
            let request = GenerateRequest {
                messages: messages.to_vec(),
                model: current_model.clone(),
                temperature,
                max_tokens,
            };
            let response = self.backend.generate(&request).await?;
            total_latency_ms += response.latency_ms;

            let quality = self.checker.check(&response.content, complexity_score);
            let escalate_now = quality.should_escalate
                && attempt < max_depth
                && current_model != self.settings.complex_model;

            steps.push(EscalationStep {
                model_used: current_model.clone(),
                response_preview: preview(&response.content, 200),
                quality_score: quality.score,
                escalated: escalate_now,
                latency_ms: response.latency_ms,
                timestamp: self.clock.now(),
            });

            if !quality.should_escalate {
                break (response, false);
            }
            if attempt >= max_depth {
                break (response, true);
            }
            if current_model == self.settings.complex_model {
                break (response, false);
            }

            debug!(
                request_id = %request_id,
                from = %current_model,
                to = %self.settings.complex_model,
                quality_score = quality.score,
                "escalating to complex model"
            );
            current_model = self.settings.complex_model.clone();
            attempt += 1;
        };

        let chain = EscalationChain {
            request_id,
            original_prompt_preview: prompt_preview,
            final_model: current_model,
            final_response: response.content.clone(),
            total_attempts: steps.len(),
            total_latency_ms,
            escalation_prevented_loop: loop_prevented,
            steps,
        };

        Ok((response, chain))
    }

    /// Handle a request directly, bypassing the escalation machinery.
    pub async fn handle_direct(
        &self,
        messages: &[Message],
        model: &str,
        temperature: f64,
        max_tokens: Option<i64>,
    ) -> Result<ChatResponse, BackendError> {
        let request = GenerateRequest {
            messages: messages.to_vec(),
            model: model.to_string(),
            temperature,
            max_tokens,
        };
        self.backend.generate(&request).await
    }

    /// Combine the attempts of a completed chain using the configured
    /// strategy.
    pub fn combine_responses(&self, chain: &EscalationChain) -> CombinedResponse {
        let responses: Vec<String> = chain
            .steps
            .iter()
            .map(|s| s.response_preview.clone())
            .collect();
        let models: Vec<String> = chain.steps.iter().map(|s| s.model_used.clone()).collect();
        self.combiner.combine(&responses, &models)
    }
}
