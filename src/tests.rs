//! # Tests Module
//!
//! This module contains crate-level tests for the wikiquote-tweet service:
//! configuration loading, the trigger event model, Twitter helpers and the
//! HTTP endpoints.
//!
//! ## Test Environment
//!
//! No test reaches Wikiquote, Pixabay or Twitter. Endpoint tests only exercise
//! routes and request rejections that never start the publishing pipeline.

use crate::{
    build_router,
    config::{get_server_port, mask_secret, AppConfig, DEFAULT_TEMP_DIRECTORY},
    handlers::{handle_health, handle_root, ButtonEvent, ClickType},
    publisher::Language,
    twitter::{
        build_tweet_payload, is_duplicate_rejection, sanitize_for_logging, TweetReference,
    },
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Json,
    Router,
};
use http_body_util::BodyExt;
use reqwest::StatusCode as HttpStatus;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// Builds a configuration from a fixed set of variables instead of the process environment.
fn config_from(
    vars: &[(&str, &str)],
) -> Result<AppConfig, Box<dyn std::error::Error + Send + Sync>> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
}

/// Creates a test application instance with all routes configured and no middleware.
fn create_test_app() -> Router {
    let config = config_from(&[
        ("PIXABAY_KEY", "pixabay-test-key"),
        ("xapi_access_token", "test-access-token"),
    ])
    .unwrap();
    build_router(Arc::new(config))
}

async fn body_string(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Tests the health endpoint handler function directly.
#[tokio::test]
async fn test_handle_health() {
    let Json(json_response): Json<Value> = handle_health().await;

    assert_eq!(json_response["status"], "healthy");
    assert_eq!(json_response["service"], "wikiquote-tweet");
}

/// Integration test for the root endpoint (GET /).
#[tokio::test]
async fn test_root_endpoint() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, handle_root().await);
}

/// Integration test for the health endpoint (GET /health).
#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json_response["status"], "healthy");
    assert_eq!(json_response["service"], "wikiquote-tweet");
}

/// An unknown click type is rejected before any quote is searched.
#[tokio::test]
async fn test_trigger_rejects_unknown_click_type() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/trigger")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"clickType": "TRIPLE"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// An event without a click type is rejected.
#[tokio::test]
async fn test_trigger_rejects_missing_click_type() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/trigger")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"serialNumber": "G030JF055364XVRB"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// GET is not routed for the trigger.
#[tokio::test]
async fn test_trigger_requires_post() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/trigger")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_click_types_map_to_languages() {
    let event: ButtonEvent = serde_json::from_str(
        r#"{"serialNumber": "G030JF055364XVRB", "clickType": "SINGLE", "batteryVoltage": "1705mV"}"#,
    )
    .unwrap();
    assert_eq!(event.click_type, ClickType::Single);

    assert_eq!(ClickType::Single.language(), Language::English);
    assert_eq!(ClickType::Double.language(), Language::Spanish);
    assert_eq!(ClickType::Long.language(), Language::Portuguese);
}

#[test]
fn test_config_from_lookup() {
    let config = config_from(&[
        ("PIXABAY_KEY", "pixabay-key"),
        ("xapi_access_token", "access-token-value"),
        ("xapi_refresh_token", "refresh"),
        ("xapi_client_id", "client"),
        ("xapi_client_secret", "secret"),
        ("TEMP_DIRECTORY", "/var/tmp/quotes"),
    ])
    .unwrap();

    assert_eq!(config.pixabay_key, "pixabay-key");
    assert_eq!(config.twitter.access_token, "access-token-value");
    assert!(config.twitter.can_refresh_token());
    assert_eq!(config.temp_dir, PathBuf::from("/var/tmp/quotes"));
}

#[test]
fn test_config_defaults() {
    let config = config_from(&[
        ("PIXABAY_KEY", "pixabay-key"),
        ("xapi_access_token", "access-token-value"),
        ("xapi_refresh_token", "refresh"),
    ])
    .unwrap();

    assert_eq!(config.temp_dir, PathBuf::from(DEFAULT_TEMP_DIRECTORY));
    assert_eq!(config.twitter.client_id, None);
    assert!(!config.twitter.can_refresh_token());
}

#[test]
fn test_config_requires_credentials() {
    let err = config_from(&[("xapi_access_token", "access-token-value")]).unwrap_err();
    assert!(err.to_string().contains("PIXABAY_KEY"));

    let err = config_from(&[("PIXABAY_KEY", "pixabay-key")]).unwrap_err();
    assert!(err.to_string().contains("xapi_access_token"));

    assert!(config_from(&[("PIXABAY_KEY", "pixabay-key"), ("xapi_access_token", "")]).is_err());
}

#[test]
fn test_mask_secret() {
    assert_eq!(mask_secret("short"), "short...");
    assert_eq!(mask_secret("0123456789abcdef"), "01234567...");
    assert_eq!(
        mask_secret("0123456789abcdefghijklmnop"),
        "01234567...ijklmnop"
    );
}

/// Unit test for the get_server_port function.
#[test]
fn test_get_server_port() {
    std::env::remove_var("PORT");
    assert_eq!(get_server_port(), 3000);

    std::env::set_var("PORT", "8080");
    assert_eq!(get_server_port(), 8080);

    std::env::remove_var("PORT");
}

#[test]
fn test_sanitize_for_logging() {
    assert_eq!(sanitize_for_logging("line\none\ttab", 100), "line one tab");
    assert_eq!(sanitize_for_logging("bell\u{7}", 100), "bell?");
    assert_eq!(
        sanitize_for_logging("ééééé", 2),
        "éé... [truncated, 10 total bytes]"
    );
}

#[test]
fn test_duplicate_rejection() {
    let body = r#"{"detail":"You are not allowed to create a Tweet with duplicate content.","status":403}"#;
    assert!(is_duplicate_rejection(HttpStatus::FORBIDDEN, body));
    assert!(!is_duplicate_rejection(HttpStatus::FORBIDDEN, r#"{"detail":"Forbidden"}"#));
    assert!(!is_duplicate_rejection(HttpStatus::UNAUTHORIZED, body));
}

#[test]
fn test_tweet_payload() {
    let text_only = build_tweet_payload("Hello", &[]);
    assert_eq!(text_only, serde_json::json!({"text": "Hello"}));

    let with_media = build_tweet_payload("Hello", &["1455952740635586573".to_string()]);
    assert_eq!(
        with_media["media"]["media_ids"][0],
        "1455952740635586573"
    );
}

#[test]
fn test_tweet_reference_url() {
    let tweet: TweetReference =
        serde_json::from_str(r#"{"id":"1445880548472328192","text":"Hi"}"#).unwrap();
    assert_eq!(
        tweet.url(),
        "https://twitter.com/i/web/status/1445880548472328192"
    );
}
