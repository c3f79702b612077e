//! The routing engine: analyzer plus strategy behind a single entry point.

pub mod strategies;

use std::sync::Arc;

use tracing::debug;

use shunt_types::{Clock, ComplexityAnalysis, RoutingDecision, Settings, SystemClock};

use crate::analyzer::PromptAnalyzer;
use self::strategies::{RoutingStrategy, ThresholdStrategy};

/// Thin composition of settings, analyzer and the current strategy.
///
/// All operations are pure with respect to the prompt; the only state is
/// the strategy chosen at construction or via [`set_strategy`](Self::set_strategy).
///
/// # Example
///
/// ```rust,ignore
/// use shunt_core::RoutingEngine;
/// use shunt_types::Settings;
///
/// let engine = RoutingEngine::new(Settings::default());
/// let decision = engine.route("Explain quantum entanglement step by step");
/// println!("{} ({:?})", decision.selected_model, decision.tier);
/// ```
pub struct RoutingEngine {
    settings: Settings,
    analyzer: PromptAnalyzer,
    strategy: Box<dyn RoutingStrategy>,
    clock: Arc<dyn Clock>,
}

impl RoutingEngine {
    /// Create an engine with the default threshold strategy and the
    /// analyzer weights from settings.
    pub fn new(settings: Settings) -> Self {
        let settings = settings.normalized();
        let strategy = ThresholdStrategy::new(
            settings.complexity_threshold_low,
            settings.complexity_threshold_high,
        );
        let analyzer = PromptAnalyzer::with_weights(settings.signal_weights);
        Self {
            settings,
            analyzer,
            strategy: Box::new(strategy),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the routing strategy at construction time.
    pub fn with_strategy(mut self, strategy: Box<dyn RoutingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the clock, e.g. for deterministic tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Change the routing strategy at runtime.
    pub fn set_strategy(&mut self, strategy: Box<dyn RoutingStrategy>) {
        self.strategy = strategy;
    }

    /// Analyze prompt complexity without making a routing decision.
    pub fn analyze(&self, prompt: &str) -> ComplexityAnalysis {
        self.analyzer.analyze(prompt)
    }

    /// Analyze the prompt and decide which model serves it.
    pub fn route(&self, prompt: &str) -> RoutingDecision {
        self.route_with_analysis(prompt).1
    }

    /// Return both the analysis and the routing decision.
    pub fn route_with_analysis(&self, prompt: &str) -> (ComplexityAnalysis, RoutingDecision) {
        let analysis = self.analyzer.analyze(prompt);
        let decision = self.strategy.decide(
            &analysis,
            &self.settings.fast_model,
            &self.settings.complex_model,
            self.clock.now(),
        );
        debug!(
            score = analysis.score,
            model = %decision.selected_model,
            quality_check = decision.requires_quality_check,
            "routed prompt"
        );
        (analysis, decision)
    }
}
