//! Drone accept loop
//!
//! Every accepted socket is connected under its peer address and
//! disconnected once the socket closes.

use crate::lifecycle::{DroneLifecycle, LifecycleError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Accept drone connections until the listener fails
pub async fn serve(listener: TcpListener, lifecycle: Arc<DroneLifecycle>) -> std::io::Result<()> {
    info!("Listening for drones on {}", listener.local_addr()?);

    loop {
        let (socket, addr) = listener.accept().await?;
        debug!(%addr, "Connection accepted");

        let lifecycle = lifecycle.clone();
        tokio::spawn(async move {
            handle_drone(socket, addr, lifecycle).await;
        });
    }
}

async fn handle_drone(mut socket: TcpStream, addr: SocketAddr, lifecycle: Arc<DroneLifecycle>) {
    match lifecycle.connect(&addr).await {
        Ok(()) => {}
        // Registered, only the notification was lost
        Err(LifecycleError::Transport(e)) => {
            error!(%addr, "Connect notification failed: {}", e);
        }
        Err(e) => {
            warn!(%addr, "Dropping connection: {}", e);
            return;
        }
    }

    let mut buf = vec![0u8; 4096];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) => {
                debug!(%addr, "Drone closed connection");
                break;
            }
            Ok(n) => {
                debug!(%addr, bytes = n, "Drone traffic");
            }
            Err(e) => {
                warn!(%addr, "Read error: {}", e);
                break;
            }
        }
    }

    if let Err(e) = lifecycle.disconnect(&addr.to_string()).await {
        error!(%addr, "Disconnect failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ConnectedDroneRegistry;
    use crate::sink::{QueueReceiver, SharedQueue};
    use fleet_shared::{LifecycleEvent, Subject};
    use std::time::Duration;
    use tokio::time::timeout;

    async fn next_event(rx: &mut QueueReceiver) -> LifecycleEvent {
        timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("queue closed")
    }

    #[tokio::test]
    async fn test_socket_lifetime_drives_registry() {
        let queue = SharedQueue::new(16);
        let mut rx = queue.declare("logger").await;
        let lifecycle = Arc::new(DroneLifecycle::new(
            ConnectedDroneRegistry::new(),
            Arc::new(queue),
            vec!["logger".into()],
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let server_addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(serve(listener, lifecycle.clone()));

        let drone = TcpStream::connect(server_addr).await.expect("connect");
        let drone_addr = drone.local_addr().expect("drone addr").to_string();

        let connected = next_event(&mut rx).await;
        assert_eq!(connected.subject(), Subject::DroneConnected);
        assert_eq!(connected.address(), Some(drone_addr.as_str()));
        assert!(lifecycle.registry().contains(&drone_addr).await);

        drop(drone);

        let disconnected = next_event(&mut rx).await;
        assert_eq!(disconnected.subject(), Subject::DroneDisconnected);
        assert_eq!(disconnected.address(), Some(drone_addr.as_str()));
        assert!(lifecycle.registry().is_empty().await);

        server.abort();
    }
}
