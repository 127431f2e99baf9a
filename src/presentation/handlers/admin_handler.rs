// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Path},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::domain::models::user::User;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::tag_repository::TagRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::access_policy::require_admin;
use crate::presentation::errors::{AppError, RequestError};
use crate::presentation::middleware::auth_middleware::CurrentUser;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_jobs: u64,
    pub total_tags: u64,
    pub total_users: u64,
}

pub async fn list_users(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
) -> Result<Json<Vec<User>>, AppError> {
    require_admin(&admin)?;
    Ok(Json(users.list().await?))
}

/// 切换用户启用状态，管理员不能停用自己
pub async fn toggle_active(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, AppError> {
    require_admin(&admin)?;
    if user_id == admin.id {
        return Err(RequestError::BadRequest("You cannot deactivate your own account.".to_string()).into());
    }

    let target = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| RequestError::NotFound("User not found.".to_string()))?;
    let updated = users.set_active(user_id, !target.is_active).await?;
    info!(user_id, is_active = updated.is_active, "User status changed");
    Ok(Json(updated))
}

/// 删除用户及其全部任务，管理员不能删除自己
pub async fn delete_user(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;
    if user_id == admin.id {
        return Err(RequestError::BadRequest("You cannot delete your own account.".to_string()).into());
    }

    users.delete(user_id).await?;
    info!(user_id, "User deleted");
    Ok(Json(json!({ "success": true, "message": "User deleted successfully." })))
}

pub async fn stats(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(tags): Extension<Arc<dyn TagRepository>>,
    Extension(users): Extension<Arc<dyn UserRepository>>,
) -> Result<Json<StatsResponse>, AppError> {
    Ok(Json(StatsResponse {
        total_jobs: jobs.count_jobs().await?,
        total_tags: tags.count().await?,
        total_users: users.count().await?,
    }))
}
