//! Connected drone records

use std::net::SocketAddr;
use std::time::Instant;

/// Anything that can identify a drone by its network address
///
/// The registry never looks at any other drone attribute.
pub trait DroneExport {
    fn identifying_address(&self) -> String;
}

impl DroneExport for SocketAddr {
    fn identifying_address(&self) -> String {
        self.to_string()
    }
}

impl DroneExport for str {
    fn identifying_address(&self) -> String {
        self.to_string()
    }
}

impl DroneExport for String {
    fn identifying_address(&self) -> String {
        self.clone()
    }
}

/// A drone currently connected to the server
#[derive(Debug, Clone)]
pub struct DroneRecord {
    pub address: String,
    pub connected_at: Instant,
}

impl DroneRecord {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            connected_at: Instant::now(),
        }
    }
}

impl DroneExport for DroneRecord {
    fn identifying_address(&self) -> String {
        self.address.clone()
    }
}
