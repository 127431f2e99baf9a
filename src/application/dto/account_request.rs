// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::models::profile::ProfileUpdate;
use crate::domain::models::user::User;

/// 注册请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, max = 64, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// 登录请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// 登录或注册成功后返回的凭据
#[derive(Debug, Serialize)]
pub struct AccountResponseDto {
    pub success: bool,
    pub user: User,
    pub api_key: String,
}

impl AccountResponseDto {
    pub fn new(user: User) -> Self {
        Self {
            success: true,
            api_key: user.api_key.clone(),
            user,
        }
    }
}

/// 更新用户配置请求，未提供的字段保持原值
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequestDto {
    #[validate(length(max = 64, message = "displayName is too long"))]
    pub display_name: Option<String>,
    #[validate(
        length(max = 2048, message = "avatarUrl is too long"),
        custom(function = "validate_avatar_url")
    )]
    pub avatar_url: Option<String>,
    #[validate(length(max = 512, message = "userAgent is too long"))]
    pub user_agent: Option<String>,
    /// 每条结果之间的延迟（毫秒）
    #[validate(range(max = 60_000, message = "delayBetweenRequestsMs must be at most 60000"))]
    pub delay_between_requests_ms: Option<u64>,
}

impl From<UpdateProfileRequestDto> for ProfileUpdate {
    fn from(dto: UpdateProfileRequestDto) -> Self {
        Self {
            display_name: dto.display_name,
            avatar_url: dto.avatar_url,
            user_agent: dto.user_agent,
            delay_between_requests_ms: dto.delay_between_requests_ms,
        }
    }
}

// Blank resets to the default avatar
fn validate_avatar_url(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("avatar_url")
            .with_message("avatarUrl must be an http(s) URL".into())),
    }
}
