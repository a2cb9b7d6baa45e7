//! Test server harness for E2E testing
//!
//! Provides TestTokenServer for spawning real token server instances in tests.

use crate::fixtures::{test_config, unconfigured_config};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use token_service::config::Config;
use token_service::crypto::{JwtSigner, TokenSigner};
use token_service::observability::metrics::{init_metrics_recorder, standalone_metrics_handle};
use token_service::routes::{self, AppState};
use tokio::task::JoinHandle;

/// One Prometheus recorder per test process.
///
/// The first server installs the global recorder; later servers reuse its
/// handle so `/metrics` reflects everything recorded in the process.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn metrics_handle() -> Result<PrometheusHandle, anyhow::Error> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = match init_metrics_recorder() {
        Ok(handle) => handle,
        // Another harness (or test) installed a recorder first
        Err(_) => standalone_metrics_handle().map_err(|e| anyhow::anyhow!(e))?,
    };

    Ok(METRICS_HANDLE.get_or_init(|| handle).clone())
}

/// Test harness for spawning the token server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_token_flow_e2e() -> Result<(), anyhow::Error> {
///     let server = TestTokenServer::spawn().await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .post(format!("{}/api/token", server.url()))
///         .json(&serde_json::json!({"roomName": "r", "participantName": "p"}))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestTokenServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestTokenServer {
    /// Spawn a fully configured server using the real JWT signer
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        let config = test_config();
        let signer = Arc::new(JwtSigner::new(config.token_ttl_seconds));
        Self::spawn_with(config, signer).await
    }

    /// Spawn a server with no signing configuration
    pub async fn spawn_unconfigured() -> Result<Self, anyhow::Error> {
        let config = unconfigured_config();
        let signer = Arc::new(JwtSigner::new(config.token_ttl_seconds));
        Self::spawn_with(config, signer).await
    }

    /// Spawn a server with an explicit config and signer
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Use the token service's real route builder
    /// - Run in the background until the harness is dropped
    pub async fn spawn_with(
        config: Config,
        signer: Arc<dyn TokenSigner>,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState { config, signer });

        let app = routes::build_routes(state, metrics_handle()?);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
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

    /// POST `/api/token` and return the issued token
    ///
    /// Fails if the server does not answer 200.
    pub async fn request_token(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<String, anyhow::Error> {
        let response = reqwest::Client::new()
            .post(format!("{}/api/token", self.url()))
            .json(&serde_json::json!({
                "roomName": room_name,
                "participantName": participant_name,
            }))
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;
        if !status.is_success() {
            anyhow::bail!("Token request failed with {}: {}", status, body);
        }

        body["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Response has no token field: {}", body))
    }
}

impl Drop for TestTokenServer {
    fn drop(&mut self) {
        // Abort the HTTP server task when the test completes
        self._handle.abort();
    }
}
