//! Response combination strategies.
//!
//! When a request escalates through multiple models, a [`CombineStrategy`]
//! decides how the chain's attempts become a single result. Strategies are
//! value objects swapped at controller construction.

use shunt_types::{CombinedResponse, preview};

/// Assemble a single result from the attempts of a completed chain.
///
/// `responses` and `models` are parallel slices in attempt order.
pub trait CombineStrategy: Send + Sync {
    /// Combine the attempts into one response.
    fn combine(&self, responses: &[String], models: &[String]) -> CombinedResponse;
}

/// Use the latest (most escalated) response.
///
/// The recommended default: escalation fired because earlier responses were
/// insufficient, so the answer from the most capable model wins.
pub struct UseLatest;

impl CombineStrategy for UseLatest {
    fn combine(&self, responses: &[String], models: &[String]) -> CombinedResponse {
        CombinedResponse {
            primary_response: responses.last().cloned().unwrap_or_default(),
            supporting_context: None,
            models_used: models.to_vec(),
            strategy_label: "use_latest".into(),
        }
    }
}

/// Use the latest response but keep earlier attempts as context.
///
/// Useful for debugging or for showing users how the response evolved
/// through escalation.
pub struct MergeWithContext;

impl CombineStrategy for MergeWithContext {
    fn combine(&self, responses: &[String], models: &[String]) -> CombinedResponse {
        if responses.len() <= 1 {
            return CombinedResponse {
                primary_response: responses.first().cloned().unwrap_or_default(),
                supporting_context: None,
                models_used: models.to_vec(),
                strategy_label: "single_response".into(),
            };
        }

        let context_parts: Vec<String> = responses[..responses.len() - 1]
            .iter()
            .zip(models)
            .enumerate()
            .map(|(i, (resp, model))| {
                format!("[Attempt {} from {}]:\n{}", i + 1, model, preview(resp, 500))
            })
            .collect();

        CombinedResponse {
            primary_response: responses.last().cloned().unwrap_or_default(),
            supporting_context: Some(context_parts.join("\n\n")),
            models_used: models.to_vec(),
            strategy_label: "merge_with_context".into(),
        }
    }
}

/// Use the response with the best quality score.
///
/// Per-step quality scores are not threaded through this interface yet, so
/// the strategy assumes escalation improved quality and picks the latest
/// response.
pub struct UseBestQuality;

impl CombineStrategy for UseBestQuality {
    fn combine(&self, responses: &[String], models: &[String]) -> CombinedResponse {
        CombinedResponse {
            primary_response: responses.last().cloned().unwrap_or_default(),
            supporting_context: None,
            models_used: models.to_vec(),
            strategy_label: "use_best_quality".into(),
        }
    }
}
