//! Lifecycle events published to the shared queue
//!
//! Every event carries a [`Subject`] and a flat string body. The body shape
//! is fixed per subject and consumed by downstream logging services:
//!
//! | subject              | body        |
//! |----------------------|-------------|
//! | `DRONE_CONNECTED`    | `{address}` |
//! | `DRONE_DUPLICATE`    | `{error}`   |
//! | `DRONE_DISCONNECTED` | `{address}` |
//! | `DRONE_NOTFOUND`     | `{error}`   |

use std::collections::BTreeMap;
use std::fmt;

use crate::now_ms;

/// Body key carrying the drone address
pub const BODY_ADDRESS: &str = "address";

/// Body key carrying an error description
pub const BODY_ERROR: &str = "error";

/// Subject of a lifecycle event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Subject {
    Unspecified = 0,
    /// A drone was added to the connected registry
    DroneConnected = 1,
    /// A connect was refused because the address is already registered
    DroneDuplicate = 2,
    /// A drone was removed from the connected registry
    DroneDisconnected = 3,
    /// A disconnect was refused because the address is not registered
    DroneNotfound = 4,
}

impl Subject {
    /// Wire name used by queue consumers
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Unspecified => "SUBJECT_UNSPECIFIED",
            Subject::DroneConnected => "DRONE_CONNECTED",
            Subject::DroneDuplicate => "DRONE_DUPLICATE",
            Subject::DroneDisconnected => "DRONE_DISCONNECTED",
            Subject::DroneNotfound => "DRONE_NOTFOUND",
        }
    }

    /// Parse a wire name back into a subject
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUBJECT_UNSPECIFIED" => Some(Subject::Unspecified),
            "DRONE_CONNECTED" => Some(Subject::DroneConnected),
            "DRONE_DUPLICATE" => Some(Subject::DroneDuplicate),
            "DRONE_DISCONNECTED" => Some(Subject::DroneDisconnected),
            "DRONE_NOTFOUND" => Some(Subject::DroneNotfound),
            _ => None,
        }
    }

    /// True for subjects that report a refused request
    pub fn is_failure(&self) -> bool {
        matches!(self, Subject::DroneDuplicate | Subject::DroneNotfound)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection lifecycle notification
///
/// Built through the constructors below so the body always matches the
/// subject. Once emitted the event belongs to the queue.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LifecycleEvent {
    #[prost(enumeration = "Subject", tag = "1")]
    pub subject: i32,
    #[prost(btree_map = "string, string", tag = "2")]
    pub body: BTreeMap<String, String>,
    /// Creation time in milliseconds since Unix epoch
    #[prost(uint64, tag = "3")]
    pub timestamp_ms: u64,
}

impl LifecycleEvent {
    fn with_field(subject: Subject, key: &str, value: String) -> Self {
        let mut body = BTreeMap::new();
        body.insert(key.to_string(), value);
        Self {
            subject: subject.into(),
            body,
            timestamp_ms: now_ms(),
        }
    }

    /// `DRONE_CONNECTED {address}`
    pub fn connected(address: impl Into<String>) -> Self {
        Self::with_field(Subject::DroneConnected, BODY_ADDRESS, address.into())
    }

    /// `DRONE_DUPLICATE {error}`
    pub fn duplicate(error: impl Into<String>) -> Self {
        Self::with_field(Subject::DroneDuplicate, BODY_ERROR, error.into())
    }

    /// `DRONE_DISCONNECTED {address}`
    pub fn disconnected(address: impl Into<String>) -> Self {
        Self::with_field(Subject::DroneDisconnected, BODY_ADDRESS, address.into())
    }

    /// `DRONE_NOTFOUND {error}`
    pub fn not_found(error: impl Into<String>) -> Self {
        Self::with_field(Subject::DroneNotfound, BODY_ERROR, error.into())
    }

    /// The `address` body field, if present
    pub fn address(&self) -> Option<&str> {
        self.body.get(BODY_ADDRESS).map(String::as_str)
    }

    /// The `error` body field, if present
    pub fn error(&self) -> Option<&str> {
        self.body.get(BODY_ERROR).map(String::as_str)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.subject())?;
        for (i, (key, value)) in self.body.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " {}: {:?}", key, value)?;
        }
        f.write_str(" }")
    }
}

/// One event addressed to one named queue, as framed on the broker link
#[derive(Clone, PartialEq, prost::Message)]
pub struct QueueFrame {
    #[prost(string, tag = "1")]
    pub queue: String,
    #[prost(message, optional, tag = "2")]
    pub event: Option<LifecycleEvent>,
}

impl QueueFrame {
    pub fn new(queue: impl Into<String>, event: LifecycleEvent) -> Self {
        Self {
            queue: queue.into(),
            event: Some(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_body_shape() {
        let event = LifecycleEvent::disconnected("10.0.0.7:4000");
        assert_eq!(event.subject(), Subject::DroneDisconnected);
        assert_eq!(event.body.len(), 1);
        assert_eq!(event.address(), Some("10.0.0.7:4000"));
        assert!(event.error().is_none());
        assert!(event.timestamp_ms > 0);
    }

    #[test]
    fn test_not_found_body_shape() {
        let event = LifecycleEvent::not_found("Drone 10.0.0.9 is not connected");
        assert_eq!(event.subject(), Subject::DroneNotfound);
        assert_eq!(event.body.len(), 1);
        assert_eq!(event.error(), Some("Drone 10.0.0.9 is not connected"));
        assert!(event.address().is_none());
    }

    #[test]
    fn test_subject_names() {
        assert_eq!(Subject::DroneDisconnected.as_str(), "DRONE_DISCONNECTED");
        assert_eq!(Subject::DroneNotfound.as_str(), "DRONE_NOTFOUND");
        assert_eq!(Subject::from_name("DRONE_NOTFOUND"), Some(Subject::DroneNotfound));
        assert_eq!(Subject::from_name("DRONE_LOST"), None);
        assert!(Subject::DroneNotfound.is_failure());
        assert!(!Subject::DroneConnected.is_failure());
    }

    #[test]
    fn test_display() {
        let event = LifecycleEvent::connected("a");
        assert_eq!(event.to_string(), "DRONE_CONNECTED { address: \"a\" }");
    }
}
