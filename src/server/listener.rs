use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use tokio::net::{TcpListener, lookup_host};
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::handler::RequestHandler;
use crate::server::worker::{Spawner, TaskSpawner};

/// Owns the listening socket and hands each connection to a worker.
pub struct Server {
    config: Arc<Config>,
    handler: Arc<RequestHandler>,
    spawner: Arc<dyn Spawner>,
}

impl Server {
    pub fn new(config: Arc<Config>, handler: Arc<RequestHandler>) -> Self {
        Self::with_spawner(config, handler, Arc::new(TaskSpawner))
    }

    pub fn with_spawner(
        config: Arc<Config>,
        handler: Arc<RequestHandler>,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        Self {
            config,
            handler,
            spawner,
        }
    }

    /// Binds the first IPv4 address the configured host resolves to.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let addr = self.config.bind_addr();
        let v4 = lookup_host(addr.as_str())
            .await
            .with_context(|| format!("failed to resolve {}", addr))?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| anyhow!("{} has no IPv4 address", addr))?;
        let listener = TcpListener::bind(v4)
            .await
            .with_context(|| format!("failed to bind {}", v4))?;
        info!("Listening on {} ({})", addr, v4);
        Ok(listener)
    }

    /// Accepts forever. A failed accept is logged and skipped.
    pub async fn run(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (socket, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept connection");
                    continue;
                }
            };
            info!("Accepted connection from {}", peer);

            let handler = Arc::clone(&self.handler);
            let read_buffer_size = self.config.read_buffer_size;
            self.spawner.spawn(Box::pin(async move {
                let mut conn = Connection::new(socket, handler, read_buffer_size);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
                tracing::debug!(%peer, status = ?conn.status().map(|s| s.as_u16()), "Connection closed");
            }));
        }
    }
}
