//! End-to-end tests of the HTTP router using `tower::ServiceExt::oneshot`.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use timing_mock::clock::ManualClock;
use timing_mock::config::ServerConfig;
use timing_mock::http::state::seeded_repository;
use timing_mock::http::{create_router, AppState};

fn config() -> ServerConfig {
    ServerConfig {
        series_seed: Some(2026),
        ..ServerConfig::default()
    }
}

fn app() -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
    ));
    let config = config();
    let repository = seeded_repository(&config, clock.as_ref());
    let state = AppState::with_parts(config, repository, clock.clone());
    (create_router(state), clock)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, None).await
}

/// Pull the test code out of the send_code message.
fn code_from(message: &str) -> String {
    let start = message.find("test code: ").unwrap() + "test code: ".len();
    message[start..start + 6].to_string()
}

// =========================================================
// Fortune
// =========================================================

#[tokio::test]
async fn test_analyze_birthday_shape() {
    let (app, _) = app();
    let (status, body) = post(
        &app,
        "/analyze/birthday",
        json!({"birthday": "2027-09-19", "name": "n", "email": "e", "phone": "p"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    for category in ["health", "career", "love"] {
        let times = body[category]["time"].as_array().unwrap();
        let values = body[category]["value"].as_array().unwrap();
        assert_eq!(times.len(), 1080);
        assert_eq!(values.len(), 1080);
        assert!(times[0].as_str().unwrap().ends_with(" 01:00"));
        assert!(values
            .iter()
            .all(|v| (60..=100).contains(&v.as_u64().unwrap())));
    }
}

#[tokio::test]
async fn test_analyze_birthday_is_stable_per_birthday() {
    let (app, _) = app();
    let req = json!({"birthday": "1990-05-17", "name": "", "email": "", "phone": ""});
    let (_, first) = post(&app, "/analyze/birthday", req.clone()).await;
    let (_, second) = post(&app, "/analyze/birthday", req).await;
    assert_eq!(first["love"]["value"], second["love"]["value"]);
}

#[tokio::test]
async fn test_analyze_invalid_birthday_is_400() {
    let (app, _) = app();
    let (status, body) = post(
        &app,
        "/analyze/birthday",
        json!({"birthday": "2024-13-40", "name": "", "email": "", "phone": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("2024-13-40"));
}

#[tokio::test]
async fn test_analyze_missing_birthday_is_client_error() {
    let (app, _) = app();
    let (status, _) = post(&app, "/analyze/birthday", json!({"name": "x"})).await;
    assert!(status.is_client_error());
}

// =========================================================
// Accounts
// =========================================================

#[tokio::test]
async fn test_login_seed_account() {
    let (app, _) = app();
    let (status, body) = post(
        &app,
        "/auth/login",
        json!({"username": "admin@example.com", "password": "123456"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "token_admin");
    assert_eq!(body["username"], "admin");
    assert_eq!(body["name"], "Administrator");
}

#[tokio::test]
async fn test_login_wrong_password_is_business_failure() {
    let (app, _) = app();
    let (status, body) = post(
        &app,
        "/auth/login",
        json!({"username": "admin@example.com", "password": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_send_code_for_registered_email() {
    let (app, _) = app();
    let (_, body) = post(
        &app,
        "/register/send_code",
        json!({"email": "admin@example.com"}),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("already registered"));
}

#[tokio::test]
async fn test_full_registration_flow() {
    let (app, _) = app();
    let email = "test@example.com";

    let (_, sent) = post(&app, "/register/send_code", json!({"email": email})).await;
    assert_eq!(sent["success"], true);
    let code = code_from(sent["message"].as_str().unwrap());

    let (_, valid) = post(
        &app,
        "/register/validate_code",
        json!({"email": email, "verification_code": code}),
    )
    .await;
    assert_eq!(valid["success"], true);

    let form = json!({
        "name": "Test User",
        "email": email,
        "verification_code": code,
        "password": "123456",
        "confirm_password": "123456"
    });
    let (_, registered) = post(&app, "/register/submit", form.clone()).await;
    assert_eq!(registered["success"], true);
    assert_eq!(registered["username"], "test");
    assert_eq!(registered["token"], "token_test");
    assert_eq!(registered["name"], "Test User");

    let (_, again) = post(&app, "/register/submit", form).await;
    assert_eq!(again["success"], false);
    assert!(again["message"].as_str().unwrap().contains("already used"));

    let (_, login) = post(
        &app,
        "/auth/login",
        json!({"username": email, "password": "123456"}),
    )
    .await;
    assert_eq!(login["success"], true);

    let (_, status) = get(&app, "/").await;
    assert_eq!(status["registered_users"], 2);
    assert_eq!(status["verification_codes_sent"], 1);
}

#[tokio::test]
async fn test_password_mismatch() {
    let (app, _) = app();
    let (_, sent) = post(&app, "/register/send_code", json!({"email": "m@example.com"})).await;
    let code = code_from(sent["message"].as_str().unwrap());

    let (_, body) = post(
        &app,
        "/register/submit",
        json!({
            "name": "M",
            "email": "m@example.com",
            "verification_code": code,
            "password": "a",
            "confirm_password": "b"
        }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Passwords do not match");
}

#[tokio::test]
async fn test_expired_code_rejected() {
    let (app, clock) = app();
    let email = "slow@example.com";
    let (_, sent) = post(&app, "/register/send_code", json!({"email": email})).await;
    let code = code_from(sent["message"].as_str().unwrap());

    clock.advance(Duration::seconds(601));

    let (_, valid) = post(
        &app,
        "/register/validate_code",
        json!({"email": email, "verification_code": code}),
    )
    .await;
    assert_eq!(valid["success"], false);
    assert!(valid["message"].as_str().unwrap().contains("expired"));

    let (_, submit) = post(
        &app,
        "/register/submit",
        json!({
            "name": "Slow",
            "email": email,
            "verification_code": code,
            "password": "pw",
            "confirm_password": "pw"
        }),
    )
    .await;
    assert_eq!(submit["success"], false);
    assert!(submit["message"].as_str().unwrap().contains("expired"));
}

#[tokio::test]
async fn test_validate_without_code() {
    let (app, _) = app();
    let (_, body) = post(
        &app,
        "/register/validate_code",
        json!({"email": "ghost@example.com", "verification_code": "123456"}),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please request a verification code first");
}

// =========================================================
// Diagnostics
// =========================================================

#[tokio::test]
async fn test_root_status() {
    let (app, _) = app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["port"], 9999);
    assert_eq!(body["test_account"]["username"], "admin@example.com");
    assert_eq!(body["registered_users"], 1);
    assert_eq!(body["verification_codes_sent"], 0);
    assert!(!body["endpoints"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_debug_codes_dump() {
    let (app, _) = app();
    post(&app, "/register/send_code", json!({"email": "d@example.com"})).await;

    let (status, body) = get(&app, "/debug/codes").await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["verification_codes"]["d@example.com"];
    assert_eq!(entry["used"], false);
    assert_eq!(entry["code"].as_str().unwrap().len(), 6);
    assert!(entry.get("timestamp").is_some());
    assert_eq!(body["registered_users"], json!(["admin@example.com"]));
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = app();
    let (status, _) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
