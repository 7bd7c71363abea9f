// Tests for sign-in polling

use seospyder_client::{ApiClient, TaskScope};
use seospyder_core::session::wait_for_profile;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const INTERVAL: Duration = Duration::from_millis(10);

#[tokio::test]
async fn test_wait_returns_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"name": "Ada"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let profile = wait_for_profile(&client, &TaskScope::new(), 5, INTERVAL)
        .await
        .unwrap();
    assert_eq!(profile.unwrap().name, "Ada");
}

#[tokio::test]
async fn test_wait_gives_up_after_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(3)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let profile = wait_for_profile(&client, &TaskScope::new(), 3, INTERVAL)
        .await
        .unwrap();
    assert!(profile.is_none());
}

#[tokio::test]
async fn test_wait_stops_when_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let scope = TaskScope::new();
    let canceller = scope.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = wait_for_profile(&client, &scope, 10_000, INTERVAL).await;
    assert!(result.unwrap_err().is_cancelled());
}
