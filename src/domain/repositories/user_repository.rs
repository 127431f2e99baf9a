// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::profile::UserProfile;
use crate::domain::models::user::{NewUser, User};
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户，邮箱重复时返回 `Conflict`
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, RepositoryError>;
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;
    /// 设置用户启用状态，返回更新后的用户
    async fn set_active(&self, id: i64, is_active: bool) -> Result<User, RepositoryError>;
    /// 删除用户及其全部任务
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
    /// 读取用户配置，从未保存过时返回 `None`
    async fn find_profile(&self, user_id: i64) -> Result<Option<UserProfile>, RepositoryError>;
    /// 保存用户配置（不存在则插入）
    async fn save_profile(&self, profile: &UserProfile) -> Result<UserProfile, RepositoryError>;
}
