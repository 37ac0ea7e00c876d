//! TCP sink that forwards lifecycle events to an external queue broker

use super::{EventSink, TransportError};
use async_trait::async_trait;
use bytes::BytesMut;
use fleet_shared::{codec, LifecycleEvent, QueueFrame};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Writes one length-prefixed frame per destination queue to a broker
///
/// The connection is opened on first emit and dropped after any write
/// failure or timeout; the next emit reconnects. A single emit never retries.
pub struct TcpQueueSink {
    addr: String,
    emit_timeout: Duration,
    stream: Mutex<Option<TcpStream>>,
}

impl TcpQueueSink {
    pub fn new(addr: impl Into<String>, emit_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            emit_timeout,
            stream: Mutex::new(None),
        }
    }

    /// Broker address this sink writes to
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn write_frames(&self, frames: &[u8]) -> Result<(), TransportError> {
        let mut guard = self.stream.lock().await;

        let mut stream = match guard.take() {
            Some(stream) => stream,
            None => {
                debug!(broker = %self.addr, "Connecting to queue broker");
                TcpStream::connect(&self.addr).await?
            }
        };

        stream.write_all(frames).await?;
        *guard = Some(stream);
        Ok(())
    }
}

#[async_trait]
impl EventSink for TcpQueueSink {
    async fn emit(
        &self,
        destinations: &[String],
        event: LifecycleEvent,
    ) -> Result<(), TransportError> {
        if destinations.is_empty() {
            return Err(TransportError::NoDestinations);
        }

        let mut buf = BytesMut::new();
        for queue in destinations {
            codec::encode_into(&QueueFrame::new(queue.clone(), event.clone()), &mut buf)?;
        }

        match timeout(self.emit_timeout, self.write_frames(&buf)).await {
            Ok(result) => {
                if let Err(e) = &result {
                    warn!(broker = %self.addr, "Emit failed: {}", e);
                }
                result
            }
            Err(_) => {
                warn!(broker = %self.addr, "Emit timed out after {:?}", self.emit_timeout);
                Err(TransportError::Timeout(self.emit_timeout))
            }
        }
    }
}
