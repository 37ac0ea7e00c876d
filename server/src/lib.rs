//! Fleet coordination server
//!
//! Tracks which drones are connected and publishes connection lifecycle
//! events to the shared queue read by logging and telemetry services.

pub mod config;
pub mod lifecycle;
pub mod listener;
pub mod registry;
pub mod sink;

pub use config::{ConfigError, ServerConfig};
pub use lifecycle::{DroneLifecycle, LifecycleError};
pub use registry::{ConnectedDroneRegistry, DroneExport, DroneRecord, RegistryError};
pub use sink::{EventSink, QueueReceiver, SharedQueue, TcpQueueSink, TransportError};
