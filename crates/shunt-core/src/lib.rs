//! # shunt-core
//!
//! Core engine for the shunt LLM gateway.
//!
//! Four tightly coupled subsystems turn a prompt into a routed, quality-
//! gated completion with a full audit trail:
//!
//! 1. [`analyzer`] -- deterministic, signal-weighted prompt complexity
//!    classification;
//! 2. [`routing`] -- pluggable strategies mapping an analysis to a model
//!    choice plus a post-check flag;
//! 3. [`quality`] -- deterministic response auditing for uncertainty,
//!    incompleteness, refusal, repetition and under-length;
//! 4. [`escalation`] -- a bounded retry loop that re-issues low-quality
//!    responses against the complex model.
//!
//! [`metrics`] shapes the per-request audit record and defines the sink
//! interface; [`gateway`] wires everything into the per-request control
//! flow. The core performs no I/O: generation goes through the injected
//! [`Backend`](shunt_llm::Backend) capability, persistence through the
//! injected [`MetricsSink`](metrics::MetricsSink).

pub mod analyzer;
pub mod escalation;
pub mod gateway;
pub mod metrics;
pub mod quality;
pub mod routing;

pub use analyzer::PromptAnalyzer;
pub use escalation::EscalationController;
pub use escalation::combine::{CombineStrategy, MergeWithContext, UseBestQuality, UseLatest};
pub use gateway::{ChatOptions, Gateway, GatewayError, GatewayReply};
pub use metrics::{MemorySink, MetricsSink, RecordBuilder, SinkError, is_flash_model};
pub use quality::QualityChecker;
pub use routing::RoutingEngine;
pub use routing::strategies::{
    AlwaysComplexStrategy, AlwaysFastStrategy, ConfidenceAwareStrategy, RoutingStrategy,
    ThresholdStrategy,
};
