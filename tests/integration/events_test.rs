// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_job_via_api, create_test_app, mock_site, TestApp, LIST_PAGE};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use futures::StreamExt;
use scrapewise::domain::models::user::User;
use scrapewise::domain::services::notifier::JobNotifier;
use std::time::Duration;
use tower::ServiceExt;

/// 打开事件流并读取第一个带事件名的帧
async fn first_event_frame(app: &TestApp, user: &User, job_id: i64) -> String {
    let request = Request::get(format!("/v1/jobs/{}/events", job_id))
        .header(header::AUTHORIZATION, TestApp::bearer(user))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    // The handler has subscribed by the time the response head is returned
    app.hub.publish_result_found(job_id, "A", 1);
    app.hub.publish_completed(job_id, 1);

    let mut body = response.into_body().into_data_stream();
    let mut received = String::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !received.contains("\n\n") {
            let chunk = body.next().await.expect("stream ended").unwrap();
            received.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    })
    .await
    .expect("no event frame within 5s");
    received
}

#[tokio::test]
async fn test_event_stream_is_limited_to_owner_and_admin() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;

    let as_bob = app
        .server
        .get(&format!("/v1/jobs/{}/events", job_id))
        .add_header("Authorization", TestApp::bearer(&app.bob))
        .await;
    assert_eq!(as_bob.status_code(), StatusCode::FORBIDDEN);

    let missing = app
        .server
        .get("/v1/jobs/9999/events")
        .add_header("Authorization", TestApp::bearer(&app.admin))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    assert_eq!(app.hub.subscriber_count(job_id), 0);
}

#[tokio::test]
async fn test_event_stream_frames_carry_event_names() {
    let app = create_test_app().await;
    let site = mock_site(LIST_PAGE).await;
    let job_id = create_job_via_api(&app, &app.alice, &format!("{}/list", site.uri()), ".item").await;

    for user in [&app.alice, &app.admin] {
        let frame = first_event_frame(&app, user, job_id).await;
        assert!(frame.starts_with("event: NewResult\n"), "{:?}", frame);
        assert!(frame.contains("data: {"), "{:?}", frame);
        assert!(frame.contains(r#""text":"A""#), "{:?}", frame);
        assert!(frame.contains(&format!(r#""job_id":{}"#, job_id)), "{:?}", frame);
    }
}
