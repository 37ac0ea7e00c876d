//! Connect a drone to the server

use super::{DroneLifecycle, LifecycleError};
use crate::registry::{DroneExport, RegistryError};
use fleet_shared::LifecycleEvent;
use tracing::{info, warn};

impl DroneLifecycle {
    /// Register a drone under its identifying address
    ///
    /// Publishes `DRONE_CONNECTED {address}` on success, or
    /// `DRONE_DUPLICATE {error}` and fails with [`LifecycleError::Duplicate`]
    /// when the address is already registered.
    pub async fn connect<D: DroneExport + ?Sized>(&self, drone: &D) -> Result<(), LifecycleError> {
        let address = drone.identifying_address();
        if address.is_empty() {
            return Err(LifecycleError::InvalidAddress);
        }

        match self.registry.add(&address).await {
            Ok(()) => {
                info!(address = %address, "Drone connected");
                self.notify(LifecycleEvent::connected(address)).await?;
                Ok(())
            }
            Err(RegistryError::DuplicateConnection { address }) => {
                let err = LifecycleError::Duplicate { address };
                warn!("Connect refused: {}", err);
                self.notify(LifecycleEvent::duplicate(err.to_string())).await?;
                Err(err)
            }
        }
    }
}
