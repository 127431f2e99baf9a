// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_job_via_api, create_test_app, mock_site, TestApp, LIST_PAGE};
use axum::http::StatusCode;
use scrapewise::domain::models::user::{NewUser, Role};
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 测试完整的抓取流程
///
/// 空白文本节点被跳过，结果保持页面顺序
#[tokio::test]
async fn test_create_job_extracts_trimmed_results() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({
            "targetUrl": format!("{}/list", site.uri()),
            "cssSelector": ".item"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["result_count"], 2);
    assert_eq!(
        body["message"],
        "Scraping job created successfully with 2 results."
    );

    let job_id = body["job_id"].as_i64().unwrap();
    let job = app.jobs.find_by_id(job_id).await.unwrap().unwrap();
    let texts: Vec<&str> = job
        .results
        .iter()
        .map(|r| r.extracted_text.as_str())
        .collect();
    assert_eq!(texts, vec!["A", "B"]);
    assert_eq!(job.owner_id, app.alice.id);
    assert_eq!(job.css_selector, ".item");
}

#[tokio::test]
async fn test_create_job_without_matches_is_saved() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({
            "targetUrl": format!("{}/list", site.uri()),
            "cssSelector": "#missing"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["result_count"], 0);
    let job_id = body["job_id"].as_i64().unwrap();
    assert!(app.jobs.find_by_id(job_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_create_job_reports_upstream_failure() {
    let app = create_test_app().await;
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({
            "targetUrl": format!("{}/list", site.uri()),
            "cssSelector": ".item"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to access the website:"));

    // The job row is kept even though the fetch failed
    let job_id = body["job_id"].as_i64().unwrap();
    let job = app.jobs.find_by_id(job_id).await.unwrap().unwrap();
    assert!(job.results.is_empty());
}

#[tokio::test]
async fn test_create_job_validates_required_fields() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({ "targetUrl": "   ", "cssSelector": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Please provide both URL and selector.");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["targetUrl", "cssSelector"]);

    assert!(app.jobs.list_jobs(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_guest_cannot_create_jobs() {
    let app = create_test_app().await;
    let guest = app
        .users
        .create(&NewUser::with_password(
            "visitor",
            "guest@example.com",
            "Guest123!",
            Role::Guest,
        ))
        .await
        .unwrap();

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&guest))
        .json(&json!({ "targetUrl": "http://example.com", "cssSelector": "p" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_jobs_are_private_to_owner_and_admin() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let url = format!("{}/list", site.uri());
    let job_id = create_job_via_api(&app, &app.alice, &url, ".item").await;
    create_job_via_api(&app, &app.bob, &url, "div").await;

    let alice_list: Value = app
        .server
        .get("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await
        .json();
    assert_eq!(alice_list.as_array().unwrap().len(), 1);
    assert_eq!(alice_list[0]["result_count"], 2);
    assert_eq!(alice_list[0]["owner_name"], "alice");

    let admin_list: Value = app
        .server
        .get("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await
        .json();
    assert_eq!(admin_list.as_array().unwrap().len(), 2);

    let as_bob = app
        .server
        .get(&format!("/v1/jobs/{}", job_id))
        .add_header("Authorization", TestApp::bearer(&app.bob))
        .await;
    assert_eq!(as_bob.status_code(), StatusCode::FORBIDDEN);

    let as_admin = app
        .server
        .get(&format!("/v1/jobs/{}", job_id))
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(as_admin.status_code(), StatusCode::OK);
    assert_eq!(as_admin.json::<Value>()["results"].as_array().unwrap().len(), 2);

    let missing = app
        .server
        .get("/v1/jobs/9999")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_job_removes_results() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;

    let forbidden = app
        .server
        .delete(&format!("/v1/jobs/{}", job_id))
        .add_header("Authorization", TestApp::bearer(&app.bob))
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

    let deleted = app
        .server
        .delete(&format!("/v1/jobs/{}", job_id))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert!(app.jobs.find_by_id(job_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_job_tags_ignores_unknown_ids() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;

    let tag: Value = app
        .server
        .post("/v1/tags")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .json(&json!({ "name": "News" }))
        .await
        .json();
    let tag_id = tag["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/v1/jobs/{}/tags", job_id))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .json(&json!({ "tagIds": [tag_id, 4242] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let tags: Value = response.json();
    assert_eq!(tags.as_array().unwrap().len(), 1);
    assert_eq!(tags[0]["name"], "News");
    assert_eq!(tags[0]["color"], "#6a11cb");
}
