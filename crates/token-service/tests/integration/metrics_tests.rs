//! Integration tests for the /metrics endpoint

use reqwest::StatusCode;
use token_test_utils::{TestTokenServer, TEST_PARTICIPANT, TEST_ROOM};

/// Issuance outcomes show up in the Prometheus exposition
#[tokio::test]
async fn test_metrics_report_token_issuance() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let client = reqwest::Client::new();

    server.request_token(TEST_ROOM, TEST_PARTICIPANT).await?;
    client
        .post(format!("{}/api/token", server.url()))
        .json(&serde_json::json!({}))
        .send()
        .await?;

    let response = client.get(format!("{}/metrics", server.url())).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await?;
    assert!(
        body.contains("token_issuance_total"),
        "missing issuance counter in:\n{}",
        body
    );
    assert!(body.contains("error_category=\"validation\""));
    assert!(
        !body.contains(TEST_PARTICIPANT),
        "participant names must not appear in metrics"
    );

    Ok(())
}
