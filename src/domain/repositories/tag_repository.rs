// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::tag::{Tag, TagUsage};
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;

/// 标签仓库特质
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// 列出所有标签及其关联的任务数
    async fn list_with_usage(&self) -> Result<Vec<TagUsage>, RepositoryError>;
    /// 根据ID集合查找标签，未知ID被忽略
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>, RepositoryError>;
    /// 创建标签，名称忽略大小写重复时返回 `Conflict`
    async fn create(&self, name: &str, color: &str) -> Result<Tag, RepositoryError>;
    /// 删除标签及其任务关联
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
    /// 标签总数
    async fn count(&self) -> Result<u64, RepositoryError>;
}
