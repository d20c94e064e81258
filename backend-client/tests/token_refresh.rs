#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use saferoute_backend_client::ApiError;
use saferoute_backend_client::Client;
use saferoute_backend_client::CredentialStore;
use saferoute_backend_client::InMemoryCredentials;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn user_body() -> serde_json::Value {
    json!({
        "_id": "u1",
        "name": "Asha",
        "email": "asha@example.com",
        "role": "user"
    })
}

fn client_for(server: &MockServer, access: &str, refresh: Option<&str>) -> (Client, Arc<InMemoryCredentials>) {
    let creds = Arc::new(InMemoryCredentials::new(
        Some(access.to_string()),
        refresh.map(str::to_string),
    ));
    let client = Client::new(format!("{}/api", server.uri()))
        .unwrap()
        .with_credentials(creds.clone());
    (client, creds)
}

async fn mount_refresh(server: &MockServer, template: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "r1" })))
        .respond_with(template)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn attaches_current_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _creds) = client_for(&server, "a1", Some("r1"));
    let user = client.current_user().await.unwrap();
    assert_eq!(user.email, "asha@example.com");
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })),
        1,
    )
    .await;

    let (client, creds) = client_for(&server, "stale", Some("r1"));
    let user = client.current_user().await.unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(creds.access_token().as_deref(), Some("fresh"));
    assert_eq!(creds.refresh_token().as_deref(), Some("r1"));
}

#[tokio::test]
async fn later_requests_observe_the_refreshed_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })),
        1,
    )
    .await;

    let (client, _creds) = client_for(&server, "stale", Some("r1"));
    client.current_user().await.unwrap();
    let contacts = client.list_contacts().await.unwrap();
    assert!(contacts.is_empty());
}

#[tokio::test]
async fn second_unauthorized_is_returned_without_another_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "revoked"})))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })),
        1,
    )
    .await;

    let (client, _creds) = client_for(&server, "stale", Some("r1"));
    let err = client.current_user().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("fallback"), "revoked");
}

#[tokio::test]
async fn failed_refresh_surfaces_the_original_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(403).set_body_json(json!({"message": "refresh token invalid"})),
        1,
    )
    .await;

    let (client, creds) = client_for(&server, "stale", Some("r1"));
    let err = client.current_user().await.unwrap_err();

    match &err {
        ApiError::Status {
            status, message, ..
        } => {
            assert_eq!(*status, StatusCode::UNAUTHORIZED);
            assert_eq!(message.as_deref(), Some("jwt expired"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(creds.access_token().as_deref(), Some("stale"));
}

#[tokio::test]
async fn missing_refresh_token_skips_the_refresh_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let (client, _creds) = client_for(&server, "stale", None);
    let err = client.current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn other_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let (client, _creds) = client_for(&server, "a1", Some("r1"));
    let err = client.list_sos_alerts().await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.user_message("Unable to load SOS alerts."), "Unable to load SOS alerts.");
}

#[tokio::test]
async fn refresh_call_carries_no_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "a2" })),
        1,
    )
    .await;

    let (client, creds) = client_for(&server, "a1", Some("r1"));
    let token = client.refresh_access_token("r1").await.unwrap();

    assert_eq!(token, "a2");
    // Refreshing directly does not touch the stored credentials.
    assert_eq!(creds.access_token().as_deref(), Some("a1"));
}
