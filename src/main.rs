use std::sync::Arc;

use rootserve::config::Config;
use rootserve::http::handler::RequestHandler;
use rootserve::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Arc::new(Config::load()?);
    tracing::info!(root = %cfg.root.display(), host = ?cfg.host, port = cfg.port, "Starting");

    let handler = Arc::new(RequestHandler::from_config(&cfg));

    if cfg.refresh_index {
        let index = handler.index().clone();
        match tokio::task::spawn_blocking(move || index.refresh_root()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Error when updating index.html: {:#}", e),
            Err(e) => tracing::warn!("Index refresh task failed: {}", e),
        }
    }

    let server = Server::new(cfg, handler);
    let listener = server.bind().await?;

    tokio::select! {
        res = server.run(listener) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
