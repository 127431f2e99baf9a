// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing::info;

use crate::config::settings::AuthSettings;
use crate::domain::models::user::{NewUser, Role, User};
use crate::domain::repositories::job_repository::RepositoryError;
use crate::domain::repositories::user_repository::UserRepository;

/// 确保配置中的管理员账号存在
///
/// 账号已存在时不修改任何内容，返回 `None`
pub async fn ensure_admin(
    users: &dyn UserRepository,
    settings: &AuthSettings,
) -> Result<Option<User>, RepositoryError> {
    if !settings.seed_admin {
        return Ok(None);
    }
    if users.find_by_email(&settings.admin_email).await?.is_some() {
        return Ok(None);
    }

    let admin = users
        .create(&NewUser::with_password(
            "admin",
            &settings.admin_email,
            &settings.admin_password,
            Role::Admin,
        ))
        .await?;
    info!(user_id = admin.id, email = %admin.email, "Seeded administrator account");
    Ok(Some(admin))
}
