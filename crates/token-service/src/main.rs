use std::sync::Arc;
use token_service::config::{Config, PRIVATE_KEY_ENV_VAR};
use token_service::crypto::Rs256Signer;
use token_service::observability::metrics::init_metrics_recorder;
use token_service::routes::{self, AppState};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "coze_token_service=debug,token_service=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coze Token Service");

    let config = Config::from_env();
    if !config.has_private_key() {
        // Not fatal: token requests are answered with a configuration error.
        warn!(
            "{} is not set; token requests will fail until it is configured",
            PRIVATE_KEY_ENV_VAR
        );
    }

    let addr = config.socket_addr().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    let state = Arc::new(AppState {
        config,
        signer: Arc::new(Rs256Signer),
    });

    let app = routes::build_routes(state, metrics_handle);

    info!("Coze Token Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Coze Token Service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
