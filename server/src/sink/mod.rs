//! Event sinks for publishing lifecycle events to the shared queue
//!
//! This module handles:
//! - The `EventSink` abstraction consumed by lifecycle operations
//! - An in-process queue hub with named bounded queues
//! - A TCP sink that frames events for an external queue broker

mod queue;
mod tcp;

#[cfg(test)]
pub(crate) mod recording;

pub use queue::{QueueReceiver, SharedQueue};
pub use tcp::TcpQueueSink;

use async_trait::async_trait;
use fleet_shared::{codec::CodecError, LifecycleEvent};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while handing an event to the queue transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("No destination queues given")]
    NoDestinations,

    #[error("Unknown queue: {0}")]
    UnknownQueue(String),

    #[error("Queue {0} is full")]
    QueueFull(String),

    #[error("Queue {0} is closed")]
    QueueClosed(String),

    #[error("Emit timed out after {0:?}")]
    Timeout(Duration),

    #[error("Broker I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame encode error: {0}")]
    Codec(#[from] CodecError),
}

/// Destination for lifecycle events
///
/// `emit` takes ownership of the event and must not block indefinitely.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, destinations: &[String], event: LifecycleEvent)
        -> Result<(), TransportError>;
}

