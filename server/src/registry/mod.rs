//! Registry of drones currently connected to the server
//!
//! This module handles:
//! - Tracking one record per connected drone address
//! - Atomic find-then-mutate access for lifecycle operations

mod manager;
mod record;

pub use manager::{ConnectedDroneRegistry, DroneTable, RegistryError};
pub use record::{DroneExport, DroneRecord};
