//! Drone connection lifecycle operations
//!
//! This module handles:
//! - Connecting and disconnecting drones against the shared registry
//! - Emitting exactly one lifecycle event per request
//! - Surfacing refusals and transport failures to the caller
//!
//! Each operation decides and mutates under a single registry lock, then
//! notifies the configured queues after the lock is released. A mutation
//! that already happened is never undone because its notification failed.

mod connect;
mod disconnect;

use crate::registry::ConnectedDroneRegistry;
use crate::sink::{EventSink, TransportError};
use fleet_shared::LifecycleEvent;
use std::sync::Arc;
use thiserror::Error;

/// Outcome errors of a lifecycle request
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Drone {address} is not connected")]
    NotConnected { address: String },

    #[error("Drone {address} is already connected")]
    Duplicate { address: String },

    #[error("Drone address must not be empty")]
    InvalidAddress,

    #[error("Failed to publish lifecycle event: {0}")]
    Transport(#[from] TransportError),
}

impl LifecycleError {
    /// True when the request was refused because of connection state
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            LifecycleError::NotConnected { .. } | LifecycleError::Duplicate { .. }
        )
    }
}

/// Connect/disconnect service over one registry and one event sink
pub struct DroneLifecycle {
    registry: ConnectedDroneRegistry,
    sink: Arc<dyn EventSink>,
    destinations: Vec<String>,
}

impl DroneLifecycle {
    pub fn new(
        registry: ConnectedDroneRegistry,
        sink: Arc<dyn EventSink>,
        destinations: Vec<String>,
    ) -> Self {
        Self {
            registry,
            sink,
            destinations,
        }
    }

    pub fn registry(&self) -> &ConnectedDroneRegistry {
        &self.registry
    }

    /// Queues every lifecycle event is published to
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    async fn notify(&self, event: LifecycleEvent) -> Result<(), TransportError> {
        self.sink.emit(&self.destinations, event).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::sink::recording::RecordingSink;

    pub const LOGGER_QUEUE: &str = "inbound-logger-service";

    /// Lifecycle over a registry pre-populated with `connected`
    pub async fn lifecycle_with(connected: &[&str]) -> (DroneLifecycle, Arc<RecordingSink>) {
        let registry = ConnectedDroneRegistry::new();
        for address in connected {
            registry.add(*address).await.expect("seed registry");
        }
        let sink = Arc::new(RecordingSink::new());
        let lifecycle = DroneLifecycle::new(
            registry,
            sink.clone(),
            vec![LOGGER_QUEUE.to_string()],
        );
        (lifecycle, sink)
    }
}
