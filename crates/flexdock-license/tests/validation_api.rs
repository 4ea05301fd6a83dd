//! Integration tests for the license validation client and cache.
//!
//! These tests run against a local `wiremock` server standing in for the
//! real validation service, and verify the full degradation contract:
//!
//! - a 200 body maps field-for-field into [`ValidationResponse`];
//! - a rejection status surfaces the server's message (or a generic one);
//! - a transport failure resolves — never panics or errors — to
//!   `"API validation error"`;
//! - a missing key is answered locally with zero network calls;
//! - the cache collapses repeated checks into exactly one request.

use std::sync::Arc;

use flexdock_license::{CachedValidator, LicenseClient, ValidationCache, ValidationResponse};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a client pointed at the mock server's `/validate` route.
fn client_for(server: &MockServer) -> LicenseClient {
    LicenseClient::from_endpoint_str(&format!("{}/validate", server.uri()))
        .expect("mock server URI must be a valid endpoint")
}

#[tokio::test]
async fn test_valid_key_maps_success_body() {
    // Arrange: the server accepts the key and reports usage.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .and(query_param("key", "premium-key"))
        .and(body_json(json!({
            "component_name": "FlexDock",
            "items_count": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "message": "ok",
            "usage_count": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Act
    let response = client_for(&server)
        .validate(Some("premium-key"), "FlexDock", 5)
        .await;

    // Assert
    assert_eq!(
        response,
        ValidationResponse {
            valid: true,
            message: "ok".to_string(),
            usage_count: Some(10),
        }
    );
}

#[tokio::test]
async fn test_rejection_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Key expired"
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .validate(Some("stale-key"), "FlexDock", 4)
        .await;

    assert!(!response.valid);
    assert_eq!(response.message, "Key expired");
}

#[tokio::test]
async fn test_rejection_without_message_uses_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .validate(Some("any-key"), "FlexDock", 4)
        .await;

    assert!(!response.valid);
    assert_eq!(response.message, "API validation failed");
}

#[tokio::test]
async fn test_unparseable_body_degrades_to_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .validate(Some("any-key"), "FlexDock", 4)
        .await;

    assert!(!response.valid);
    assert_eq!(response.message, "API validation error");
}

#[tokio::test]
async fn test_connection_failure_resolves_to_transport_error() {
    // Port 1 is unassigned on the loopback; the connection is refused.
    let client = LicenseClient::from_endpoint_str("http://127.0.0.1:1/validate")
        .expect("endpoint string is a valid URL");

    let response = client.validate(Some("any-key"), "FlexDock", 4).await;

    assert!(!response.valid);
    assert_eq!(response.message, "API validation error");
}

#[tokio::test]
async fn test_missing_key_makes_no_network_call() {
    // Arrange: any request to the server would trip the expect(0).
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = client_for(&server).validate(None, "FlexDock", 5).await;

    assert_eq!(response, ValidationResponse::no_key());
    assert_eq!(response.message, "No API key provided");
}

#[tokio::test]
async fn test_empty_key_is_treated_as_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = client_for(&server).validate(Some(""), "FlexDock", 5).await;
    assert_eq!(response, ValidationResponse::no_key());
}

#[tokio::test]
async fn test_cache_collapses_identical_checks_into_one_request() {
    // Arrange: the server tolerates exactly one request.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .and(query_param("key", "premium-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "message": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let validator = CachedValidator::new(client_for(&server), Arc::new(ValidationCache::new()));

    // Act: two identical checks.
    let first = validator.check(Some("premium-key"), "FlexDock", 5).await;
    let second = validator.check(Some("premium-key"), "FlexDock", 5).await;

    // Assert: same verdict, one network call (checked by expect(1) on drop).
    assert_eq!(first, second);
    assert!(first.valid);
}

#[tokio::test]
async fn test_clearing_the_cache_forces_a_fresh_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "message": "ok"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let validator = CachedValidator::new(client_for(&server), Arc::new(ValidationCache::new()));

    let _ = validator.check(Some("premium-key"), "FlexDock", 5).await;
    validator.cache().clear("premium-key", None);
    let _ = validator.check(Some("premium-key"), "FlexDock", 5).await;
}

#[tokio::test]
async fn test_missing_key_is_never_cached() {
    let validator = CachedValidator::new(LicenseClient::new(), Arc::new(ValidationCache::new()));

    let _ = validator.check(None, "FlexDock", 5).await;

    assert!(validator.cache().is_empty());
}
