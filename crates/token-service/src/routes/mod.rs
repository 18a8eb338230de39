//! HTTP routes for the token service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::crypto::JwtSigner;
use crate::handlers;
use axum::{
    routing::{any, get},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Path of the token endpoint.
pub const TOKEN_PATH: &str = "/api/token";

/// Application state shared across handlers.
///
/// Read-only for the lifetime of the process.
pub struct AppState {
    /// Service configuration, including the key secret.
    pub config: Config,

    /// Signing primitive used for every issued token.
    pub signer: Arc<dyn JwtSigner>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/api/token` - Token issuance (POST; other verbs get a JSON 405)
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let token_routes = Router::new()
        .route(TOKEN_PATH, any(handlers::handle_token_request))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    token_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
}
