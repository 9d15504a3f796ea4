mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_shorten_success() {
    let (state, _store) = common::memory_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/very/long/path" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    let code = body["code"].as_str().unwrap();

    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        body["short_url"].as_str().unwrap(),
        format!("{}/{}", common::BASE_URL, code)
    );
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn test_shorten_is_deterministic() {
    let (state, _store) = common::memory_state();
    let server = common::test_server(state);

    let first = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/very/long/path" }))
        .await;
    let second = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/very/long/path" }))
        .await;

    let first = first.json::<serde_json::Value>();
    let second = second.json::<serde_json::Value>();

    assert_eq!(first["code"], second["code"]);
    assert_eq!(first["short_url"], second["short_url"]);
}

#[tokio::test]
async fn test_shorten_different_urls_get_different_codes() {
    let (state, _store) = common::memory_state();
    let server = common::test_server(state);

    let first = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a" }))
        .await
        .json::<serde_json::Value>();
    let second = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/b" }))
        .await
        .json::<serde_json::Value>();

    assert_ne!(first["code"], second["code"]);
}

#[tokio::test]
async fn test_shorten_empty_url_is_rejected() {
    let (state, store) = common::memory_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    // The rejected request must not have written anything.
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shorten_invalid_url_is_rejected() {
    let (state, _store) = common::memory_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shorten_storage_outage_returns_503_not_success() {
    let server = common::test_server(common::failing_state());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "storage_error");
}
