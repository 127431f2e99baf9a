// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Router;
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use scrapewise::config::settings::DatabaseSettings;
use scrapewise::domain::models::user::{NewUser, Role, User};
use scrapewise::domain::repositories::job_repository::JobRepository;
use scrapewise::domain::repositories::tag_repository::TagRepository;
use scrapewise::domain::repositories::user_repository::UserRepository;
use scrapewise::domain::services::job_pipeline::JobPipeline;
use scrapewise::engines::reqwest_engine::ReqwestEngine;
use scrapewise::infrastructure::database::connection;
use scrapewise::infrastructure::notifications::job_event_hub::JobEventHub;
use scrapewise::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use scrapewise::infrastructure::repositories::tag_repo_impl::TagRepositoryImpl;
use scrapewise::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use scrapewise::presentation::routes::{build_app, AppServices};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ADMIN_PASSWORD: &str = "Admin123!";
pub const USER_PASSWORD: &str = "User123!";

/// 列表页面：两个非空节点，一个空节点
pub const LIST_PAGE: &str = r#"<html><body>
<div class="item">A</div>
<div class="item"> B </div>
<div class="item">   </div>
</body></html>"#;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub jobs: Arc<dyn JobRepository>,
    pub users: Arc<dyn UserRepository>,
    pub hub: Arc<JobEventHub>,
    /// 与 `server` 相同的路由，用于需要直接读取响应流的测试
    pub router: Router,
    pub admin: User,
    pub alice: User,
    pub bob: User,
}

impl TestApp {
    pub fn bearer(user: &User) -> String {
        format!("Bearer {}", user.api_key)
    }
}

async fn memory_db() -> Arc<DatabaseConnection> {
    // A single connection keeps every query on the same in-memory database
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: None,
        idle_timeout: None,
        log_queries: false,
    };
    let db = connection::create_pool(&settings)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

/// 创建测试应用：内存数据库、一个管理员和两个普通用户
pub async fn create_test_app() -> TestApp {
    let db = memory_db().await;

    let jobs: Arc<dyn JobRepository> = Arc::new(JobRepositoryImpl::new(db.clone()));
    let tags: Arc<dyn TagRepository> = Arc::new(TagRepositoryImpl::new(db.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(UserRepositoryImpl::new(db.clone()));

    let admin = users
        .create(&NewUser::with_password(
            "admin",
            "admin@scrapewise.com",
            ADMIN_PASSWORD,
            Role::Admin,
        ))
        .await
        .unwrap();
    let alice = users
        .create(&NewUser::with_password(
            "alice",
            "alice@example.com",
            USER_PASSWORD,
            Role::User,
        ))
        .await
        .unwrap();
    let bob = users
        .create(&NewUser::with_password(
            "bob",
            "bob@example.com",
            USER_PASSWORD,
            Role::User,
        ))
        .await
        .unwrap();

    let hub = Arc::new(JobEventHub::default());
    let fetcher = Arc::new(ReqwestEngine::new(Some("scrapewise-tests")).unwrap());
    let pipeline = Arc::new(JobPipeline::new(jobs.clone(), fetcher, hub.clone()));

    let app = build_app(AppServices {
        jobs: jobs.clone(),
        tags,
        users: users.clone(),
        pipeline,
        hub: hub.clone(),
    });

    TestApp {
        server: TestServer::new(app.clone()).unwrap(),
        db,
        jobs,
        users,
        hub,
        router: app,
        admin,
        alice,
        bob,
    }
}

/// 启动一个在 `/list` 返回指定页面的模拟站点
pub async fn mock_site(body: &str) -> MockServer {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(&site)
        .await;
    site
}

/// 通过API为指定用户创建一个任务，返回任务ID
pub async fn create_job_via_api(app: &TestApp, user: &User, url: &str, selector: &str) -> i64 {
    let response = app
        .server
        .post("/v1/jobs")
        .add_header("Authorization", TestApp::bearer(user))
        .json(&serde_json::json!({ "targetUrl": url, "cssSelector": selector }))
        .await;
    let body: serde_json::Value = response.json();
    body["job_id"].as_i64().expect("job id missing from response")
}
