//! HTTP server lifecycle

use crate::api::create_router;
use crate::service::AppState;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Serves the API on the configured address until told to stop
pub struct ApiServer {
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ApiServer {
    pub fn new(state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { state, shutdown_tx }
    }

    /// Bind the listener and serve until [`ApiServer::stop`] is called
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = self
            .state
            .config()
            .bind_address()
            .parse()
            .context("Invalid HTTP bind address")?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let app = create_router(self.state.clone());
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!("HTTP server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Ask the server to finish in-flight requests and stop
    pub fn stop(&self) {
        info!("Stopping HTTP server...");
        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to HTTP server: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, StoreSettings};
    use crate::store::InMemoryRecordStore;
    use std::time::Duration;

    #[tokio::test]
    async fn test_serve_and_stop() {
        let config = AppConfig::with_store(StoreSettings::new("http://localhost", "key"));
        let state =
            Arc::new(AppState::with_store(config, Arc::new(InMemoryRecordStore::new())).unwrap());
        let server = Arc::new(ApiServer::new(state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = {
            let server = server.clone();
            tokio::spawn(async move { server.serve(listener).await })
        };

        let body = reqwest::get(format!("http://{}/", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Football Team API is running!"));

        server.stop();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
