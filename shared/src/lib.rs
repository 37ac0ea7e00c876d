//! Fleet Shared Protocol Types
//!
//! This crate provides the lifecycle event types and frame codec shared by
//! the fleet server and the queue consumers it notifies.

pub mod codec;
pub mod event;

use std::time::{SystemTime, UNIX_EPOCH};

// Re-export commonly used types at crate root
pub use event::{LifecycleEvent, QueueFrame, Subject};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Operating limits shared across the fleet
pub mod limits {
    /// Default capacity of each in-process queue
    pub const QUEUE_CAPACITY: usize = 1024;

    /// Upper bound on a single emit to an external broker
    pub const EMIT_TIMEOUT_MS: u64 = 2000;

    /// Queue that receives lifecycle events when none is configured
    pub const DEFAULT_LOGGER_QUEUE: &str = "inbound-logger-service";
}
