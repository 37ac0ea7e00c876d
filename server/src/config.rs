//! Server configuration with environment overrides

use fleet_shared::limits;
use std::time::Duration;
use thiserror::Error;

/// Listen address for drone connections
pub const ENV_LISTEN_ADDR: &str = "FLEET_LISTEN_ADDR";
/// Comma-separated queues that receive lifecycle events
pub const ENV_LOGGER_QUEUE: &str = "INBOUND_LOGGER_SERVICE_QUEUE";
/// External queue broker; unset means the in-process queue
pub const ENV_QUEUE_ADDR: &str = "FLEET_QUEUE_ADDR";
pub const ENV_QUEUE_CAPACITY: &str = "FLEET_QUEUE_CAPACITY";
pub const ENV_EMIT_TIMEOUT_MS: &str = "FLEET_EMIT_TIMEOUT_MS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must name at least one queue")]
    NoQueues(&'static str),
}

/// Configuration for the fleet server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address drones connect to
    pub listen_addr: String,
    /// Queues every lifecycle event is published to
    pub event_queues: Vec<String>,
    /// External broker address, if events leave the process
    pub queue_addr: Option<String>,
    /// Capacity of each in-process queue
    pub queue_capacity: usize,
    /// Upper bound on a single broker emit
    pub emit_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            event_queues: vec![limits::DEFAULT_LOGGER_QUEUE.into()],
            queue_addr: None,
            queue_capacity: limits::QUEUE_CAPACITY,
            emit_timeout: Duration::from_millis(limits::EMIT_TIMEOUT_MS),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by any set environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
            config.listen_addr = addr;
        }

        if let Some(raw) = lookup(ENV_LOGGER_QUEUE) {
            let queues: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from)
                .collect();
            if queues.is_empty() {
                return Err(ConfigError::NoQueues(ENV_LOGGER_QUEUE));
            }
            config.event_queues = queues;
        }

        config.queue_addr = lookup(ENV_QUEUE_ADDR).filter(|a| !a.trim().is_empty());

        if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
            config.queue_capacity = parse_number(ENV_QUEUE_CAPACITY, &raw)?;
        }

        if let Some(raw) = lookup(ENV_EMIT_TIMEOUT_MS) {
            config.emit_timeout = Duration::from_millis(parse_number(ENV_EMIT_TIMEOUT_MS, &raw)?);
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
