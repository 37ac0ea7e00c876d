//! Sink that records emissions for assertions

use super::{EventSink, TransportError};
use async_trait::async_trait;
use fleet_shared::LifecycleEvent;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(Vec<String>, LifecycleEvent)>>,
    fail: AtomicBool,
    attempts: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following emit fail with a closed-queue error
    pub fn fail_emits(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of emit calls, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .expect("recording lock poisoned")
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn destinations(&self) -> Vec<Vec<String>> {
        self.events
            .lock()
            .expect("recording lock poisoned")
            .iter()
            .map(|(d, _)| d.clone())
            .collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(
        &self,
        destinations: &[String],
        event: LifecycleEvent,
    ) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::QueueClosed(destinations.join(",")));
        }
        self.events
            .lock()
            .expect("recording lock poisoned")
            .push((destinations.to_vec(), event));
        Ok(())
    }
}
