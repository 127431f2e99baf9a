// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::domain::models::user::User;
use crate::domain::repositories::user_repository::UserRepository;

/// 无需认证的路径
const PUBLIC_PATHS: &[&str] = &[
    "/health",
    "/v1/version",
    "/v1/accounts/register",
    "/v1/accounts/login",
];

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserRepository>,
}

/// 已认证的当前用户
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// 认证中间件
///
/// 将 `Authorization: Bearer <api_key>` 解析为启用状态的用户，
/// 并以 `CurrentUser` 扩展注入请求
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(StatusCode)` - 认证失败的状态码
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path();
    debug!("AuthMiddleware processing path: {}", path);
    if PUBLIC_PATHS.contains(&path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match state.users.find_by_api_key(&token).await {
        Ok(Some(user)) if user.is_active => {
            req.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(req).await)
        }
        Ok(Some(user)) => {
            warn!("Rejected API key of inactive user {}", user.id);
            Err(StatusCode::UNAUTHORIZED)
        }
        Ok(None) => {
            warn!("API key not found");
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(e) => {
            error!("Database error checking API key: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod tests;
