//! In-process shared queue with named bounded channels

use super::{EventSink, TransportError};
use async_trait::async_trait;
use fleet_shared::{limits, LifecycleEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

/// Consumer end of one named queue
pub struct QueueReceiver {
    name: String,
    rx: mpsc::Receiver<LifecycleEvent>,
}

impl QueueReceiver {
    /// Receive the next event, or `None` once the queue is gone
    pub async fn recv(&mut self) -> Option<LifecycleEvent> {
        self.rx.recv().await
    }

    /// Receive an event if one is already waiting
    pub fn try_recv(&mut self) -> Option<LifecycleEvent> {
        self.rx.try_recv().ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Hub of named queues; cloning shares the same hub
///
/// Emission never waits: a full queue is reported as an error.
#[derive(Clone)]
pub struct SharedQueue {
    queues: Arc<RwLock<HashMap<String, mpsc::Sender<LifecycleEvent>>>>,
    capacity: usize,
}

impl SharedQueue {
    /// Create a hub whose queues hold at most `capacity` events each
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Declare a queue and take its consumer end
    ///
    /// Declaring an existing name replaces it; the previous receiver sees
    /// the queue close once drained.
    pub async fn declare(&self, name: impl Into<String>) -> QueueReceiver {
        let name = name.into();
        let (tx, rx) = mpsc::channel(self.capacity);

        if self.queues.write().await.insert(name.clone(), tx).is_some() {
            warn!(queue = %name, "Queue redeclared, previous consumer detached");
        }

        QueueReceiver { name, rx }
    }

    /// Drop a queue; pending events stay readable by its receiver
    pub async fn remove(&self, name: &str) -> bool {
        self.queues.write().await.remove(name).is_some()
    }

    /// Names of all declared queues
    pub async fn queue_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.queues.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for SharedQueue {
    fn default() -> Self {
        Self::new(limits::QUEUE_CAPACITY)
    }
}

#[async_trait]
impl EventSink for SharedQueue {
    async fn emit(
        &self,
        destinations: &[String],
        event: LifecycleEvent,
    ) -> Result<(), TransportError> {
        if destinations.is_empty() {
            return Err(TransportError::NoDestinations);
        }

        let queues = self.queues.read().await;

        // Resolve every destination before sending anything
        let mut senders = Vec::with_capacity(destinations.len());
        for name in destinations {
            let tx = queues
                .get(name)
                .ok_or_else(|| TransportError::UnknownQueue(name.clone()))?;
            senders.push((name, tx));
        }

        for (name, tx) in senders {
            tx.try_send(event.clone()).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => TransportError::QueueFull(name.clone()),
                mpsc::error::TrySendError::Closed(_) => TransportError::QueueClosed(name.clone()),
            })?;
            debug!(queue = %name, subject = %event.subject(), "Event enqueued");
        }

        Ok(())
    }
}
