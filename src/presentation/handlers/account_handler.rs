// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::application::dto::account_request::{
    AccountResponseDto, LoginRequestDto, RegisterRequestDto, UpdateProfileRequestDto,
};
use crate::domain::models::profile::{ProfileUpdate, UserProfile};
use crate::domain::models::user::{verify_password, NewUser, Role, User};
use crate::domain::repositories::user_repository::UserRepository;
use crate::presentation::errors::{AppError, RequestError};
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 注册新账号，角色固定为普通用户
pub async fn register(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Json(payload): Json<RegisterRequestDto>,
) -> Result<(StatusCode, Json<AccountResponseDto>), AppError> {
    payload.validate()?;

    let user = users
        .create(&NewUser::with_password(
            &payload.username,
            &payload.email,
            &payload.password,
            Role::User,
        ))
        .await?;

    info!(user_id = user.id, "Registered new account");
    Ok((StatusCode::CREATED, Json(AccountResponseDto::new(user))))
}

/// 以邮箱和密码登录，返回 API 密钥
pub async fn login(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Json(payload): Json<LoginRequestDto>,
) -> Result<Json<AccountResponseDto>, AppError> {
    payload.validate()?;

    let invalid = || RequestError::Unauthorized("Invalid email or password.".to_string());
    let user = users
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = user.id, "Failed login attempt");
        return Err(invalid().into());
    }
    if !user.is_active {
        return Err(RequestError::Unauthorized("This account has been deactivated.".to_string()).into());
    }
    if user.role == Role::Guest {
        return Err(RequestError::Forbidden("Guest accounts cannot sign in.".to_string()).into());
    }

    Ok(Json(AccountResponseDto::new(user)))
}

/// 当前用户信息
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

/// 当前用户的抓取配置，从未保存过时返回默认值
pub async fn get_profile(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(load_profile(users.as_ref(), user.id).await?))
}

/// 更新当前用户的抓取配置
pub async fn update_profile(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequestDto>,
) -> Result<Json<UserProfile>, AppError> {
    payload.validate()?;

    let current = load_profile(users.as_ref(), user.id).await?;
    let saved = users
        .save_profile(&ProfileUpdate::from(payload).apply_to(current))
        .await?;

    info!(user_id = user.id, "Profile updated");
    Ok(Json(saved))
}

pub(crate) async fn load_profile(
    users: &dyn UserRepository,
    user_id: i64,
) -> Result<UserProfile, AppError> {
    Ok(users
        .find_profile(user_id)
        .await?
        .unwrap_or_else(|| UserProfile::default_for(user_id)))
}
