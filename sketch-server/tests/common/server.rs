//! Test server harness for integration tests.
//!
//! Spins up the real router on a random port so tests talk HTTP to it.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use sketch_core::{HistoryStore, LocalHistoryStore};
use sketch_server::{build_router, config::default_origins, AppState, HistoryService};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A test server instance with control handles.
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with an in-memory store.
    pub async fn start() -> Self {
        Self::start_with_store(Arc::new(LocalHistoryStore::new())).await
    }

    /// Start a server persisting into `dir`.
    #[allow(dead_code)]
    pub async fn start_with_data_dir(dir: &Path) -> Self {
        let store = LocalHistoryStore::with_data_dir(dir).expect("open store");
        Self::start_with_store(Arc::new(store)).await
    }

    /// Start a server on a random available port over the given store.
    ///
    /// # Panics
    ///
    /// Panics if no port is available or server fails to bind.
    pub async fn start_with_store(store: Arc<dyn HistoryStore>) -> Self {
        let port = portpicker::pick_unused_port().expect("no available port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let state = AppState::new(HistoryService::new(store));
        let app = build_router(state, &default_origins(port));

        let listener = TcpListener::bind(addr).await.expect("failed to bind");
        let actual_addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        // Give the server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr: actual_addr,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// Get the server's base URL.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of a history route.
    #[allow(dead_code)]
    pub fn history_url(&self, suffix: &str) -> String {
        format!("http://{}/api/history/{suffix}", self.addr)
    }

    /// Gracefully shut down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(tokio::time::Duration::from_secs(5), self.handle).await;
    }
}
