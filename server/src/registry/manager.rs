//! Registry of currently connected drones

use super::record::{DroneExport, DroneRecord};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{RwLock, RwLockWriteGuard};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Drone {address} is already connected")]
    DuplicateConnection { address: String },
}

/// The connected-drone table, keyed by address
///
/// Uniqueness per address is structural: there is exactly one slot per key.
#[derive(Debug, Default)]
pub struct DroneTable {
    drones: BTreeMap<String, DroneRecord>,
}

impl DroneTable {
    pub fn find(&self, address: &str) -> Option<&DroneRecord> {
        self.drones.get(address)
    }

    /// Remove the record for `address`, returning whether one was present
    pub fn remove(&mut self, address: &str) -> bool {
        self.drones.remove(address).is_some()
    }

    pub fn add<D: DroneExport + ?Sized>(&mut self, drone: &D) -> Result<(), RegistryError> {
        let address = drone.identifying_address();
        if self.drones.contains_key(&address) {
            return Err(RegistryError::DuplicateConnection { address });
        }
        self.drones.insert(address.clone(), DroneRecord::new(address));
        Ok(())
    }

    pub fn contains(&self, address: &str) -> bool {
        self.drones.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    /// Connected addresses in ascending order
    pub fn addresses(&self) -> Vec<String> {
        self.drones.keys().cloned().collect()
    }
}

/// Shared handle to the process-wide connected-drone table
///
/// Every method takes the lock for its own duration. Callers that need to
/// decide and mutate atomically hold [`ConnectedDroneRegistry::lock`].
#[derive(Clone, Default)]
pub struct ConnectedDroneRegistry {
    table: Arc<RwLock<DroneTable>>,
}

impl ConnectedDroneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access for a find-then-mutate sequence
    pub async fn lock(&self) -> RwLockWriteGuard<'_, DroneTable> {
        self.table.write().await
    }

    /// Look up a connected drone by address
    pub async fn find(&self, address: &str) -> Option<DroneRecord> {
        self.table.read().await.find(address).cloned()
    }

    /// Remove a drone, returning whether it was connected
    pub async fn remove(&self, address: &str) -> bool {
        self.table.write().await.remove(address)
    }

    /// Register a drone, refusing duplicates
    pub async fn add<D: DroneExport + ?Sized>(&self, drone: &D) -> Result<(), RegistryError> {
        self.table.write().await.add(drone)
    }

    pub async fn contains(&self, address: &str) -> bool {
        self.table.read().await.contains(address)
    }

    /// Get the number of connected drones
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }

    /// Get list of all connected addresses
    pub async fn addresses(&self) -> Vec<String> {
        self.table.read().await.addresses()
    }
}
