//! # DrawMotion History Server Library
//!
//! Router, handlers and configuration for the drawing history server.
//! This library is used by both the binary and integration tests.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sketch_core::protocol::{HISTORY_PREFIX, SAVE_ROUTE};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod health;
pub mod metrics;
pub mod routes;
pub mod service;
pub mod validation;

pub use config::{ServerArgs, ServerConfig};
pub use service::{HistoryError, HistoryService};
pub use validation::ValidationError;

/// Request body limit: the largest accepted image plus room for the envelope.
pub const MAX_BODY_BYTES: usize = validation::MAX_IMAGE_LEN + 64 * 1024;

/// Shared application state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Save/fetch operations over the history store.
    pub service: HistoryService,
}

impl AppState {
    /// Create state around a history service.
    #[must_use]
    pub fn new(service: HistoryService) -> Self {
        Self { service }
    }
}

/// Build a CORS layer for the given browser origins.
///
/// Unparseable origins are skipped with a warning.
#[must_use]
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

/// Build the application router: history and health routes with request-id,
/// CORS and tracing layers.
///
/// The `/metrics` route is added by the binary, which owns the global
/// recorder.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let history = Router::new()
        .route(
            SAVE_ROUTE,
            post(routes::save_handler).get(routes::fetch_save_owner_handler),
        )
        .route("/{owner_id}", get(routes::fetch_handler));

    Router::new()
        // Health check endpoints (Kubernetes probes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        .nest(HISTORY_PREFIX, history)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Request ID for distributed tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(build_cors_layer(allowed_origins))
        // Structured request tracing with timing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
