// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_job_via_api, create_test_app, mock_site, TestApp, LIST_PAGE};
use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_results_are_paginated() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;

    let response = app
        .server
        .get(&format!("/v1/jobs/{}/results?page=1&page_size=1", job_id))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["total_results"], 2);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["has_previous_page"], false);
    assert_eq!(page["has_next_page"], true);
    assert_eq!(page["results"].as_array().unwrap().len(), 1);

    let invalid = app
        .server
        .get(&format!("/v1/jobs/{}/results?page=0", job_id))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

    let huge = app
        .server
        .get(&format!(
            "/v1/jobs/{}/results?page=18446744073709551615&page_size=500",
            job_id
        ))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(huge.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_csv_export_is_an_attachment() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let url = format!("{}/list", site.uri());
    let job_id = create_job_via_api(&app, &app.alice, &url, ".item").await;

    let response = app
        .server
        .get(&format!("/v1/jobs/{}/export.csv", job_id))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with(&format!(
        "attachment; filename=\"scraping_job_{}_results_",
        job_id
    )));
    assert!(disposition.ends_with(".csv\""));

    let body = response.text();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines[0],
        r#""ExtractedText","ScrapedAt","JobUrl","CssSelector","JobId""#
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with(r#""A","#));
    assert!(lines[1].ends_with(&format!(r#""{}",".item","{}""#, url, job_id)));
    assert!(lines[2].starts_with(r#""B","#));
}

#[tokio::test]
async fn test_json_export_carries_metadata() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;

    let response = app
        .server
        .get(&format!("/v1/jobs/{}/export.json", job_id))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .header("content-disposition")
        .to_str()
        .unwrap()
        .ends_with(".json\""));

    let body: Value = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(body["job"]["id"], job_id);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["metadata"]["exported_by"], "alice");
    assert_eq!(body["metadata"]["total_results"], 2);
}

#[tokio::test]
async fn test_exports_are_private() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;

    for export in ["export.csv", "export.json"] {
        let response = app
            .server
            .get(&format!("/v1/jobs/{}/{}", job_id, export))
            .add_header("Authorization", TestApp::bearer(&app.bob))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN, "{}", export);

        let as_admin = app
            .server
            .get(&format!("/v1/jobs/{}/{}", job_id, export))
            .add_header("Authorization", TestApp::bearer(&app.admin))
            .await;
        assert_eq!(as_admin.status_code(), StatusCode::OK, "{}", export);
    }

    // A forbidden delete leaves the result in place
    let job = app.jobs.find_by_id(job_id).await.unwrap().unwrap();
    let response = app
        .server
        .delete(&format!("/v1/results/{}", job.results[1].id))
        .add_header("Authorization", TestApp::bearer(&app.bob))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let job = app.jobs.find_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(job.results.len(), 2);
}

#[tokio::test]
async fn test_delete_single_result() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;
    let job = app.jobs.find_by_id(job_id).await.unwrap().unwrap();
    let first = job.results[0].id;

    let forbidden = app
        .server
        .delete(&format!("/v1/results/{}", first))
        .add_header("Authorization", TestApp::bearer(&app.bob))
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

    let deleted = app
        .server
        .delete(&format!("/v1/results/{}", first))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let job = app.jobs.find_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(job.results.len(), 1);
    assert_eq!(job.results[0].extracted_text, "B");

    let again = app
        .server
        .delete(&format!("/v1/results/{}", first))
        .add_header("Authorization", TestApp::bearer(&app.alice))
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}
