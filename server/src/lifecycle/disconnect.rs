//! Disconnect a drone from the server

use super::{DroneLifecycle, LifecycleError};
use fleet_shared::LifecycleEvent;
use tracing::{info, warn};

impl DroneLifecycle {
    /// Disconnect the drone registered under `address`
    ///
    /// A connected drone is removed and `DRONE_DISCONNECTED {address}` is
    /// published. An unknown address leaves the registry untouched, publishes
    /// `DRONE_NOTFOUND {error}` and fails with [`LifecycleError::NotConnected`].
    /// If publishing fails, the transport error is returned instead; a
    /// removal that already happened stays in effect.
    pub async fn disconnect(&self, address: &str) -> Result<(), LifecycleError> {
        if address.is_empty() {
            return Err(LifecycleError::InvalidAddress);
        }

        let removed = {
            let mut drones = self.registry.lock().await;
            drones.find(address).is_some() && drones.remove(address)
        };

        if !removed {
            let err = LifecycleError::NotConnected {
                address: address.to_string(),
            };
            warn!(address, "Disconnect refused: drone not connected");
            self.notify(LifecycleEvent::not_found(err.to_string())).await?;
            return Err(err);
        }

        info!(address, "Drone disconnected");
        self.notify(LifecycleEvent::disconnected(address)).await?;
        Ok(())
    }
}
