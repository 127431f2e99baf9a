// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, TestApp, LIST_PAGE, USER_PASSWORD};
use axum::http::StatusCode;
use scrapewise::domain::models::user::{NewUser, Role};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_health_and_version_are_public() {
    let app = create_test_app().await;

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.text(), "OK");

    let version = app.server.get("/v1/version").await;
    assert_eq!(version.status_code(), StatusCode::OK);
    assert_eq!(version.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_protected_routes_require_api_key() {
    let app = create_test_app().await;

    let response = app.server.get("/v1/jobs").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/v1/jobs")
        .add_header("Authorization", "Bearer sw_unknown")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_then_login_returns_working_key() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/accounts/register")
        .json(&json!({
            "username": "carol",
            "email": "Carol@Example.com",
            "password": "secret1"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let registered: Value = response.json();
    assert_eq!(registered["user"]["email"], "carol@example.com");
    assert_eq!(registered["user"]["role"], "user");
    assert!(registered["user"].get("password_hash").is_none());

    let response = app
        .server
        .post("/v1/accounts/login")
        .json(&json!({ "email": "carol@example.com", "password": "secret1" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let login: Value = response.json();
    let api_key = login["api_key"].as_str().unwrap();
    assert_eq!(api_key, registered["api_key"].as_str().unwrap());

    let me = app
        .server
        .get("/v1/accounts/me")
        .add_header("Authorization", format!("Bearer {}", api_key))
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);
    assert_eq!(me.json::<Value>()["username"], "carol");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_and_short_password() {
    let app = create_test_app().await;

    let duplicate = app
        .server
        .post("/v1/accounts/register")
        .json(&json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": "secret1"
        }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

    let short = app
        .server
        .post("/v1/accounts/register")
        .json(&json!({
            "username": "dave",
            "email": "dave@example.com",
            "password": "123"
        }))
        .await;
    assert_eq!(short.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures() {
    let app = create_test_app().await;

    let wrong_password = app
        .server
        .post("/v1/accounts/login")
        .json(&json!({ "email": "alice@example.com", "password": "nope-nope" }))
        .await;
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json::<Value>()["success"], false);

    app.users
        .create(&NewUser::with_password(
            "visitor",
            "guest@example.com",
            USER_PASSWORD,
            Role::Guest,
        ))
        .await
        .unwrap();
    let guest = app
        .server
        .post("/v1/accounts/login")
        .json(&json!({ "email": "guest@example.com", "password": USER_PASSWORD }))
        .await;
    assert_eq!(guest.status_code(), StatusCode::FORBIDDEN);

    app.users.set_active(app.bob.id, false).await.unwrap();
    let inactive = app
        .server
        .post("/v1/accounts/login")
        .json(&json!({ "email": "bob@example.com", "password": USER_PASSWORD }))
        .await;
    assert_eq!(inactive.status_code(), StatusCode::UNAUTHORIZED);

    // The key of a deactivated account stops working as well
    let response = app
        .server
        .get("/v1/accounts/me")
        .add_header("Authorization", TestApp::bearer(&app.bob))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_defaults_then_updates() {
    let app = create_test_app().await;

    let profile: Value = app
        .server
        .get("/v1/accounts/me/profile")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await
        .json();
    assert_eq!(profile["display_name"], "Default User");
    assert_eq!(profile["avatar_url"], "https://www.gravatar.com/avatar/?d=mp");
    assert_eq!(profile["user_agent"], Value::Null);
    assert_eq!(profile["delay_between_requests_ms"], 0);

    let updated = app
        .server
        .put("/v1/accounts/me/profile")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({ "displayName": "Alice", "userAgent": "AliceBot/1.0" }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);

    let profile: Value = app
        .server
        .get("/v1/accounts/me/profile")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await
        .json();
    assert_eq!(profile["display_name"], "Alice");
    assert_eq!(profile["user_agent"], "AliceBot/1.0");

    // Profiles are per user
    let bobs: Value = app
        .server
        .get("/v1/accounts/me/profile")
        .add_header("Authorization", TestApp::bearer(&app.bob))
        .await
        .json();
    assert_eq!(bobs["display_name"], "Default User");

    let invalid = app
        .server
        .put("/v1/accounts/me/profile")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({ "delayBetweenRequestsMs": 600000 }))
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_user_agent_is_sent_when_scraping() {
    let app = create_test_app().await;
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(header("user-agent", "AliceBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LIST_PAGE, "text/html"))
        .expect(1)
        .mount(&site)
        .await;

    let saved = app
        .server
        .put("/v1/accounts/me/profile")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({ "userAgent": "AliceBot/1.0" }))
        .await;
    assert_eq!(saved.status_code(), StatusCode::OK);

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({ "targetUrl": format!("{}/list", site.uri()), "cssSelector": ".item" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["result_count"], 2);
}
