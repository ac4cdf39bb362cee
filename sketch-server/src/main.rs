//! # DrawMotion History Server
//!
//! Persists finished drawings per user and serves them back to the gallery.

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sketch_core::{HistoryStore, LocalHistoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sketch_server::metrics;
use sketch_server::{build_router, AppState, HistoryService, ServerArgs, ServerConfig};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,sketch_server=debug,tower_http=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output (recommended for production).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sketch_server=debug,tower_http=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Open the configured store, reloading persisted histories.
fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn HistoryStore>> {
    let Some(dir) = &config.data_dir else {
        tracing::warn!("No data directory configured; history is kept in memory only");
        return Ok(Arc::new(LocalHistoryStore::new()));
    };

    let store = LocalHistoryStore::with_data_dir(dir)
        .with_context(|| format!("failed to open history store at {}", dir.display()))?;
    tracing::info!(
        data_dir = %dir.display(),
        owners = store.owner_ids().len(),
        "History store loaded"
    );
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::from(ServerArgs::parse());

    let metrics_handle = metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to initialize Prometheus metrics: {}", e))?;
    tracing::info!("Prometheus metrics initialized");

    let store = open_store(&config)?;
    let state = AppState::new(HistoryService::new(store));

    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let app = Router::new()
        .merge(metrics_router)
        .merge(build_router(state, &config.allowed_origins));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!("DrawMotion history server listening on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Prometheus metrics endpoint.
#[tracing::instrument(name = "metrics", skip(handle))]
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
