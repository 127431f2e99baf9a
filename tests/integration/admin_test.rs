// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_job_via_api, create_test_app, mock_site, TestApp, LIST_PAGE};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_admin_routes_reject_regular_users() {
    let app = create_test_app().await;

    let users = app
        .server
        .get("/v1/admin/users")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(users.status_code(), StatusCode::FORBIDDEN);

    let create_tag = app
        .server
        .post("/v1/tags")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({ "name": "News" }))
        .await;
    assert_eq!(create_tag.status_code(), StatusCode::FORBIDDEN);

    let toggle = app
        .server
        .post(&format!("/v1/admin/users/{}/toggle-active", app.bob.id))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(toggle.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tag_lifecycle() {
    let app = create_test_app().await;

    let created = app
        .server
        .post("/v1/tags")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .json(&json!({ "name": "  News ", "color": "#ff0000" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let tag: Value = created.json();
    assert_eq!(tag["name"], "News");
    assert_eq!(tag["color"], "#ff0000");

    let duplicate = app
        .server
        .post("/v1/tags")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .json(&json!({ "name": "news" }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

    let blank = app
        .server
        .post("/v1/tags")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .json(&json!({ "name": "   " }))
        .await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);

    let listed: Value = app
        .server
        .get("/v1/tags")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["job_count"], 0);

    let deleted = app
        .server
        .delete(&format!("/v1/tags/{}", tag["id"]))
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let missing = app
        .server
        .delete(&format!("/v1/tags/{}", tag["id"]))
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_user_active() {
    let app = create_test_app().await;

    let response = app
        .server
        .post(&format!("/v1/admin/users/{}/toggle-active", app.bob.id))
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["is_active"], false);

    let locked_out = app
        .server
        .get("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&app.bob))
        .await;
    assert_eq!(locked_out.status_code(), StatusCode::UNAUTHORIZED);

    let self_toggle = app
        .server
        .post(&format!("/v1/admin/users/{}/toggle-active", app.admin.id))
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(self_toggle.status_code(), StatusCode::BAD_REQUEST);

    let unknown = app
        .server
        .post("/v1/admin/users/9999/toggle-active")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_removes_their_jobs() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.bob, &format!("{}/list", site.uri()), ".item").await;

    let response = app
        .server
        .delete(&format!("/v1/admin/users/{}", app.bob.id))
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(app.jobs.find_by_id(job_id).await.unwrap().is_none());
    assert!(app.users.find_by_id(app.bob.id).await.unwrap().is_none());

    let self_delete = app
        .server
        .delete(&format!("/v1/admin/users/{}", app.admin.id))
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(self_delete.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_counts_everything() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;

    app.server
        .post("/v1/tags")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .json(&json!({ "name": "News" }))
        .await;

    let stats: Value = app
        .server
        .get("/v1/stats")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await
        .json();
    assert_eq!(stats["total_jobs"], 1);
    assert_eq!(stats["total_tags"], 1);
    assert_eq!(stats["total_users"], 3);
}
