//! Test server harness for E2E testing
//!
//! Provides TestTokenServer for spawning real token service instances in tests.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use token_service::config::Config;
use token_service::crypto::{JwtSigner, Rs256Signer};
use token_service::routes::{self, AppState, TOKEN_PATH};

/// Test harness for spawning the token service in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_issue_e2e() -> Result<(), anyhow::Error> {
///     let server = TestTokenServer::spawn(test_config(Some(test_key_material_base64()))).await?;
///     let response = reqwest::Client::new()
///         .post(server.token_url())
///         .json(&serde_json::json!({"cozeAppId": "app123", "keyId": "key456"}))
///         .send()
///         .await?;
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestTokenServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestTokenServer {
    /// Spawn a server using the real RS256 signer.
    pub async fn spawn(config: Config) -> Result<Self, anyhow::Error> {
        Self::spawn_with_signer(config, Arc::new(Rs256Signer)).await
    }

    /// Spawn a server with a caller-supplied signer.
    ///
    /// The server binds to 127.0.0.1:0 and runs in the background until the
    /// harness is dropped with the test runtime.
    pub async fn spawn_with_signer(
        config: Config,
        signer: Arc<dyn JwtSigner>,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState { config, signer });

        // A standalone recorder; the global one can only be installed once
        // per process.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of the token endpoint
    pub fn token_url(&self) -> String {
        format!("{}{}", self.url(), TOKEN_PATH)
    }
}
