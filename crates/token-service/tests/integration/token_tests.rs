//! Integration tests for POST /api/token
//!
//! Covers the success path, the 400/500 error shapes, and the check order
//! (validation before configuration before signing).

use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;
use token_service::config::DEFAULT_TOKEN_TTL_SECONDS;
use token_service::crypto::mock::MockSigner;
use token_test_utils::{
    config_without, test_config, unconfigured_config, TestTokenServer, TokenAssertions,
    TEST_API_KEY, TEST_API_SECRET, TEST_PARTICIPANT, TEST_ROOM, TEST_SERVER_URL,
};

async fn post_token(
    server: &TestTokenServer,
    body: serde_json::Value,
) -> Result<(StatusCode, serde_json::Value), anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/api/token", server.url()))
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    Ok((status, body))
}

// ============================================================================
// Success Path
// ============================================================================

/// Valid request with full configuration returns token, server URL and echoes
#[tokio::test]
async fn test_issue_token_success() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) = post_token(
        &server,
        json!({"roomName": TEST_ROOM, "participantName": TEST_PARTICIPANT}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serverUrl"], TEST_SERVER_URL);
    assert_eq!(body["roomName"], TEST_ROOM);
    assert_eq!(body["participantName"], TEST_PARTICIPANT);

    let token = body["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("token must be a string"))?;
    assert!(!token.is_empty());

    token
        .assert_valid_jwt()
        .assert_verifies_with(TEST_API_SECRET)
        .assert_issued_by(TEST_API_KEY)
        .assert_for_identity(TEST_PARTICIPANT)
        .assert_room_grant(TEST_ROOM)
        .assert_expires_in(DEFAULT_TOKEN_TTL_SECONDS);

    Ok(())
}

/// Names are echoed exactly as submitted, including unicode and spaces
#[tokio::test]
async fn test_names_echoed_verbatim() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) = post_token(
        &server,
        json!({"roomName": "Salle de réunion 1", "participantName": " Zoë "}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roomName"], "Salle de réunion 1");
    assert_eq!(body["participantName"], " Zoë ");

    Ok(())
}

/// Two identical requests each yield a valid credential
#[tokio::test]
async fn test_repeated_requests_each_get_a_token() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let first = server.request_token(TEST_ROOM, TEST_PARTICIPANT).await?;
    let second = server.request_token(TEST_ROOM, TEST_PARTICIPANT).await?;

    first.assert_valid_jwt().assert_verifies_with(TEST_API_SECRET);
    second.assert_valid_jwt().assert_verifies_with(TEST_API_SECRET);

    Ok(())
}

/// Extra request fields cannot change the granted capabilities
#[tokio::test]
async fn test_request_cannot_alter_grant() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let (status, body) = post_token(
        &server,
        json!({
            "roomName": TEST_ROOM,
            "participantName": TEST_PARTICIPANT,
            "roomAdmin": true,
            "canPublish": false,
            "video": {"roomCreate": true},
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap_or_default().to_string();
    token.assert_room_grant(TEST_ROOM);

    Ok(())
}

// ============================================================================
// Validation Errors (400)
// ============================================================================

/// Missing or empty fields return 400 and never reach the signer
#[tokio::test]
async fn test_missing_fields_return_400_without_signing() -> Result<(), anyhow::Error> {
    let signer = Arc::new(MockSigner::succeeding());
    let server = TestTokenServer::spawn_with(test_config(), signer.clone()).await?;

    for body in [
        json!({}),
        json!({"roomName": TEST_ROOM}),
        json!({"participantName": TEST_PARTICIPANT}),
        json!({"roomName": "", "participantName": TEST_PARTICIPANT}),
        json!({"roomName": TEST_ROOM, "participantName": ""}),
        json!({"roomName": 7, "participantName": TEST_PARTICIPANT}),
        json!({"roomName": TEST_ROOM, "participantName": null}),
    ] {
        let (status, response) = post_token(&server, body.clone()).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert!(response["error"].is_string(), "body: {}", body);
        assert!(response.get("token").is_none());
    }

    assert_eq!(signer.call_count(), 0, "signer must not be called");

    Ok(())
}

/// A body that is not JSON is a validation error, not a framework rejection
#[tokio::test]
async fn test_invalid_json_returns_400() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/token", server.url()))
        .header("content-type", "application/json")
        .body("{\"roomName\": ")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert!(body["error"].is_string());

    Ok(())
}

// ============================================================================
// Configuration Errors (500)
// ============================================================================

/// Valid request without signing configuration returns a generic 500
#[tokio::test]
async fn test_missing_configuration_returns_500() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn_unconfigured().await?;

    let (status, body) = post_token(
        &server,
        json!({"roomName": TEST_ROOM, "participantName": TEST_PARTICIPANT}),
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(!body.to_string().contains("LIVEKIT"));

    Ok(())
}

/// Each signing value is individually required
#[tokio::test]
async fn test_each_missing_value_returns_500() -> Result<(), anyhow::Error> {
    for var in ["LIVEKIT_API_KEY", "LIVEKIT_API_SECRET", "LIVEKIT_URL"] {
        let signer = Arc::new(MockSigner::succeeding());
        let server = TestTokenServer::spawn_with(config_without(var), signer.clone()).await?;

        let (status, body) = post_token(
            &server,
            json!({"roomName": TEST_ROOM, "participantName": TEST_PARTICIPANT}),
        )
        .await?;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "without {}", var);
        assert_eq!(body["error"], "Server configuration error");
        assert!(!body.to_string().contains(TEST_API_SECRET));
        assert_eq!(signer.call_count(), 0);
    }

    Ok(())
}

/// Invalid request with missing configuration is still a 400
#[tokio::test]
async fn test_validation_takes_precedence_over_configuration() -> Result<(), anyhow::Error> {
    let signer = Arc::new(MockSigner::succeeding());
    let server = TestTokenServer::spawn_with(unconfigured_config(), signer.clone()).await?;

    let (status, body) = post_token(&server, json!({"roomName": TEST_ROOM})).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(signer.call_count(), 0);

    Ok(())
}

// ============================================================================
// Signing Errors (500)
// ============================================================================

/// Signer failure returns 500 with a scrubbed details field
#[tokio::test]
async fn test_signing_failure_returns_500_with_details() -> Result<(), anyhow::Error> {
    let signer = Arc::new(MockSigner::failing(format!(
        "signing backend rejected key {}",
        TEST_API_SECRET
    )));
    let server = TestTokenServer::spawn_with(test_config(), signer.clone()).await?;

    let (status, body) = post_token(
        &server,
        json!({"roomName": TEST_ROOM, "participantName": TEST_PARTICIPANT}),
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate token");

    let details = body["details"].as_str().unwrap_or_default();
    assert!(details.contains("signing backend rejected key"));
    assert!(!details.contains(TEST_API_SECRET), "secret leaked: {}", details);
    assert_eq!(signer.call_count(), 1);

    Ok(())
}
