mod common;

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use sporlrelay::{error::RelayError, management::TokenStore, spotify::relay::RelayRequest};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

// Helper function to mount a token endpoint answering refresh grants
async fn mount_refresh(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_no_token_never_reaches_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let relay = relay(test_config(&server.uri()), TokenStore::new());
    let err = relay.send(&RelayRequest::get(["me"])).await.unwrap_err();

    assert!(matches!(err, RelayError::Unauthorized));
}

#[tokio::test]
async fn test_success_passes_status_and_body_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let relay = relay(test_config(&server.uri()), logged_in_store("A", "B").await);
    let upstream = relay.send(&RelayRequest::get(["me"])).await.unwrap();

    assert_eq!(upstream.status, StatusCode::OK);
    assert_eq!(upstream.body, json!({ "id": "user-1" }));
}

#[tokio::test]
async fn test_not_found_is_passed_through_without_refresh() {
    let server = MockServer::start().await;
    let error_body = json!({ "error": { "status": 404, "message": "Resource not found" } });

    Mock::given(method("GET"))
        .and(path("/v1/playlists/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body.clone()))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let relay = relay(test_config(&server.uri()), logged_in_store("A", "B").await);
    let upstream = relay
        .send(&RelayRequest::get(["playlists", "missing"]))
        .await
        .unwrap();

    assert_eq!(upstream.status, StatusCode::NOT_FOUND);
    assert_eq!(upstream.body, error_body);
}

#[tokio::test]
async fn test_unauthorized_refreshes_once_and_retries_with_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "access_token": "fresh" })),
        1,
    )
    .await;

    let store = logged_in_store("expired", "B").await;
    let relay = relay(test_config(&server.uri()), store.clone());
    let upstream = relay.send(&RelayRequest::get(["me"])).await.unwrap();

    assert_eq!(upstream.status, StatusCode::OK);
    assert_eq!(upstream.body, json!({ "id": "user-1" }));

    let state = store.get().await;
    assert_eq!(state.access_token.as_deref(), Some("fresh"));
    assert_eq!(state.refresh_token.as_deref(), Some("B"));
}

#[tokio::test]
async fn test_second_unauthorized_is_surfaced_without_another_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": { "status": 401 } })),
        )
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "access_token": "fresh" })),
        1,
    )
    .await;

    let relay = relay(test_config(&server.uri()), logged_in_store("A", "B").await);
    let upstream = relay.send(&RelayRequest::get(["me"])).await.unwrap();

    assert_eq!(upstream.status, StatusCode::UNAUTHORIZED);
    assert_eq!(upstream.body, json!({ "error": { "status": 401 } }));
}

#[tokio::test]
async fn test_failed_refresh_is_unauthorized_and_skips_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token revoked"
        })),
        1,
    )
    .await;

    let store = logged_in_store("A", "B").await;
    let relay = relay(test_config(&server.uri()), store.clone());
    let err = relay.send(&RelayRequest::get(["me"])).await.unwrap_err();

    assert!(matches!(err, RelayError::Unauthorized));
    assert_eq!(store.get().await.access_token.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_missing_refresh_token_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let store = TokenStore::new();
    store.set_from_authorization_grant(&tokens("A", None)).await;
    let relay = relay(test_config(&server.uri()), store);

    let err = relay.send(&RelayRequest::get(["me"])).await.unwrap_err();
    assert!(matches!(err, RelayError::Unauthorized));
}

#[tokio::test]
async fn test_post_body_query_and_segment_encoding() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/playlists/odd%2Fid/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:1"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", "daft punk"))
        .and(query_param("type", "track,playlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tracks": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let relay = relay(test_config(&server.uri()), logged_in_store("A", "B").await);

    let request = RelayRequest::post(
        ["playlists", "odd/id", "tracks"],
        json!({ "uris": ["spotify:track:1"] }),
    );
    assert_eq!(request.path(), "/playlists/odd/id/tracks");
    let upstream = relay.send(&request).await.unwrap();
    assert_eq!(upstream.status, StatusCode::CREATED);

    let request = RelayRequest::get(["search"])
        .query("q", "daft punk")
        .query("type", "track,playlist");
    let upstream = relay.send(&request).await.unwrap();
    assert_eq!(upstream.body, json!({ "tracks": {} }));
}

#[tokio::test]
async fn test_optional_auth_goes_out_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "markets": ["SE"] })))
        .expect(1)
        .mount(&server)
        .await;

    let relay = relay(test_config(&server.uri()), TokenStore::new());
    let upstream = relay
        .send(&RelayRequest::get(["markets"]).optional_auth())
        .await
        .unwrap();

    assert_eq!(upstream.status, StatusCode::OK);
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.request_timeout = Duration::from_millis(200);
    let relay = relay(config, logged_in_store("A", "B").await);

    let err = relay.send(&RelayRequest::get(["me"])).await.unwrap_err();
    assert!(matches!(err, RelayError::Transport(_)));
}

#[tokio::test]
async fn test_retry_after_is_kept_on_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let relay = relay(test_config(&server.uri()), logged_in_store("A", "B").await);
    let upstream = relay.send(&RelayRequest::get(["me"])).await.unwrap();

    assert_eq!(upstream.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        upstream.retry_after.as_ref().map(|v| v.to_str().unwrap()),
        Some("30")
    );
    assert_eq!(upstream.body, serde_json::Value::Null);
}
