//! Injectable id and clock capabilities.
//!
//! Escalation chains and metrics records carry timestamps and generated
//! ids. Both come from these small traits so tests can pin them down.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A source of timestamps.
pub trait Clock: Send + Sync {
    /// The current moment.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A source of short random identifiers.
pub trait IdGenerator: Send + Sync {
    /// Return `len` hex characters of fresh randomness.
    fn hex_id(&self, len: usize) -> String;
}

/// Id generator backed by UUIDv4.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn hex_id(&self, len: usize) -> String {
        Uuid::new_v4().simple().to_string().chars().take(len).collect()
    }
}
