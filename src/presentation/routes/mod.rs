// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::tag_repository::TagRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::job_pipeline::JobPipeline;
use crate::infrastructure::notifications::job_event_hub::JobEventHub;
use crate::presentation::handlers::{
    account_handler, admin_handler, job_handler, result_handler, tag_handler,
};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 路由所需的共享服务
#[derive(Clone)]
pub struct AppServices {
    pub jobs: Arc<dyn JobRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub users: Arc<dyn UserRepository>,
    pub pipeline: Arc<JobPipeline>,
    pub hub: Arc<JobEventHub>,
}

/// 创建应用路由
///
/// # 返回值
///
/// 返回未挂载任何状态的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/v1/accounts/register", post(account_handler::register))
        .route("/v1/accounts/login", post(account_handler::login));

    let protected_routes = Router::new()
        .route("/v1/accounts/me", get(account_handler::me))
        .route(
            "/v1/accounts/me/profile",
            get(account_handler::get_profile).put(account_handler::update_profile),
        )
        .route(
            "/v1/jobs",
            post(job_handler::create_job).get(job_handler::list_jobs),
        )
        .route(
            "/v1/jobs/{id}",
            get(job_handler::get_job).delete(job_handler::delete_job),
        )
        .route("/v1/jobs/{id}/tags", put(job_handler::update_tags))
        .route("/v1/jobs/{id}/events", get(job_handler::job_events))
        .route("/v1/jobs/{id}/results", get(result_handler::list_results))
        .route("/v1/jobs/{id}/export.csv", get(result_handler::export_csv))
        .route("/v1/jobs/{id}/export.json", get(result_handler::export_json))
        .route("/v1/results/{id}", delete(result_handler::delete_result))
        .route(
            "/v1/tags",
            get(tag_handler::list_tags).post(tag_handler::create_tag),
        )
        .route("/v1/tags/{id}", delete(tag_handler::delete_tag))
        .route("/v1/admin/users", get(admin_handler::list_users))
        .route(
            "/v1/admin/users/{id}/toggle-active",
            post(admin_handler::toggle_active),
        )
        .route("/v1/admin/users/{id}", delete(admin_handler::delete_user))
        .route("/v1/stats", get(admin_handler::stats));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// 组装完整的应用：路由、认证中间件、共享服务和请求追踪
pub fn build_app(services: AppServices) -> Router {
    let auth_state = AuthState {
        users: services.users.clone(),
    };

    routes()
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .layer(Extension(services.jobs))
        .layer(Extension(services.tags))
        .layer(Extension(services.users))
        .layer(Extension(services.pipeline))
        .layer(Extension(services.hub))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
