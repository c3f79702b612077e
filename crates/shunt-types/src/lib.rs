//! # shunt-types
//!
//! Core types for the shunt LLM gateway.
//!
//! Everything in this crate is a value object: chat messages and responses,
//! detected complexity signals, routing decisions, quality assessments,
//! escalation chains, per-request metrics records, and the settings schema.
//! Nothing here performs I/O; the logic that produces these values lives in
//! `shunt-core`.

pub mod chat;
pub mod config;
pub mod escalation;
pub mod ids;
pub mod quality;
pub mod record;
pub mod routing;
pub mod signal;
pub mod text;

pub use chat::{ChatResponse, Message, Role, TokenUsage};
pub use config::{Settings, SignalWeights};
pub use escalation::{CombinedResponse, EscalationChain, EscalationStep};
pub use ids::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
pub use quality::{QualityAssessment, QualityIssue, QualityIssueKind};
pub use record::RequestRecord;
pub use routing::{ModelTier, RoutingDecision};
pub use signal::{ComplexityAnalysis, ComplexityLevel, DetectedSignal, SignalKind};
pub use text::{preview, tail_chars, truncate_chars};
