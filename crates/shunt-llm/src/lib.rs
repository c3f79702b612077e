//! Back-end capability abstraction for the shunt gateway.
//!
//! The gateway core never talks to a network itself; it consumes a
//! [`Backend`] -- a single async capability mapping a message list plus a
//! model name to a [`ChatResponse`](shunt_types::ChatResponse). Concrete
//! implementations (remote APIs, local models, fakes) live outside the
//! core crates.
//!
//! - [`Backend`] trait defines the generation interface
//! - [`GenerateRequest`] carries one attempt's parameters
//! - [`BackendError`] is the typed error taxonomy surfaced by back-ends
//! - [`DeadlineBackend`] wraps any backend with a per-attempt timeout

pub mod backend;
pub mod deadline;
pub mod error;

pub use backend::{Backend, GenerateRequest};
pub use deadline::DeadlineBackend;
pub use error::{BackendError, Result};
