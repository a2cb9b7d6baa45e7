//! Integration tests for health probes and the test page
//!
//! Liveness must not depend on signing configuration; readiness must.

use reqwest::StatusCode;
use token_test_utils::TestTokenServer;

// ============================================================================
// Liveness Probe Tests
// ============================================================================

/// /health returns 200 with status "ok"
#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "ok");
    assert!(body["message"].is_string(), "message must be a string");

    Ok(())
}

/// /health is independent of signing configuration
#[tokio::test]
async fn test_health_ok_without_signing_configuration() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn_unconfigured().await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "ok");

    Ok(())
}

// ============================================================================
// Readiness Probe Tests
// ============================================================================

/// /ready returns 200 when all signing values are configured
#[tokio::test]
async fn test_ready_when_configured() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/ready", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["signing"], "configured");
    assert!(body["error"].is_null(), "error should be absent when ready");

    Ok(())
}

/// /ready returns 503 without signing configuration and names no variable
#[tokio::test]
async fn test_not_ready_when_unconfigured() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn_unconfigured().await?;

    let response = reqwest::get(format!("{}/ready", server.url())).await?;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["signing"], "unconfigured");
    assert!(!body.to_string().contains("LIVEKIT"));

    Ok(())
}

// ============================================================================
// Test Page
// ============================================================================

/// / serves the HTML test page
#[tokio::test]
async fn test_root_serves_test_page() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert!(
        content_type.as_deref().is_some_and(|ct| ct.contains("text/html")),
        "Expected text/html content type, got {:?}",
        content_type
    );
    assert!(response.text().await?.contains("/api/token"));

    Ok(())
}

/// Non-existent routes return 404
#[tokio::test]
async fn test_unknown_route_returns_404() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/api/nonexistent", server.url())).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
