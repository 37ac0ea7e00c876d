use fleet_server::{
    listener, ConnectedDroneRegistry, DroneLifecycle, EventSink, QueueReceiver, ServerConfig,
    SharedQueue, TcpQueueSink,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ServerConfig::from_env()?;

    info!("Fleet server starting");
    info!("  Drone listener: {}", config.listen_addr);
    info!("  Event queues: {}", config.event_queues.join(", "));

    let sink: Arc<dyn EventSink> = match &config.queue_addr {
        Some(addr) => {
            info!("  Queue broker: {} (timeout {:?})", addr, config.emit_timeout);
            Arc::new(TcpQueueSink::new(addr.clone(), config.emit_timeout))
        }
        None => {
            info!("  Queue broker: in-process");
            let queue = SharedQueue::new(config.queue_capacity);
            for name in &config.event_queues {
                let rx = queue.declare(name.clone()).await;
                tokio::spawn(log_queue(rx));
            }
            Arc::new(queue)
        }
    };

    let lifecycle = Arc::new(DroneLifecycle::new(
        ConnectedDroneRegistry::new(),
        sink,
        config.event_queues.clone(),
    ));

    let drone_listener = TcpListener::bind(&config.listen_addr).await?;

    tokio::select! {
        result = listener::serve(drone_listener, lifecycle.clone()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            let remaining = lifecycle.registry().len().await;
            info!("Shutting down with {} drone(s) connected", remaining);
        }
    }

    Ok(())
}

/// Drain an in-process queue into the log when no broker is configured
async fn log_queue(mut rx: QueueReceiver) {
    while let Some(event) = rx.recv().await {
        if event.subject().is_failure() {
            warn!(queue = rx.name(), "{}", event);
        } else {
            info!(queue = rx.name(), "{}", event);
        }
    }
}
