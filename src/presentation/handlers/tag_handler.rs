// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::application::dto::tag_request::CreateTagRequestDto;
use crate::domain::models::tag::{normalize_new_tag, Tag, TagUsage};
use crate::domain::repositories::tag_repository::TagRepository;
use crate::domain::services::access_policy::require_admin;
use crate::presentation::errors::{AppError, RequestError};
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 列出所有标签及其任务数
pub async fn list_tags(
    Extension(tags): Extension<Arc<dyn TagRepository>>,
) -> Result<Json<Vec<TagUsage>>, AppError> {
    Ok(Json(tags.list_with_usage().await?))
}

/// 创建标签（仅管理员）
pub async fn create_tag(
    Extension(tags): Extension<Arc<dyn TagRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateTagRequestDto>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    require_admin(&user)?;
    payload.validate()?;

    let (name, color) = normalize_new_tag(&payload.name, payload.color.as_deref());
    if name.is_empty() {
        return Err(RequestError::BadRequest("Tag name is required.".to_string()).into());
    }

    let tag = tags.create(&name, &color).await?;
    info!(tag_id = tag.id, name = %tag.name, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// 删除标签及其任务关联（仅管理员）
pub async fn delete_tag(
    Extension(tags): Extension<Arc<dyn TagRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(tag_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&user)?;
    tags.delete(tag_id).await?;
    Ok(Json(json!({ "success": true, "message": "Tag deleted successfully." })))
}
