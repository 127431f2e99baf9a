// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobResult, JobSummary, NewJob, NewJobResult};
use crate::domain::models::tag::Tag;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 违反唯一性约束
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// 任务仓库特质
///
/// 定义任务、结果以及任务与标签关联的数据访问接口
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 创建任务并关联已存在的标签，未知的标签ID被忽略
    ///
    /// 任务行单独提交，返回新分配的任务ID
    async fn create_job(&self, job: &NewJob) -> Result<i64, RepositoryError>;
    /// 在一个事务中批量写入一次运行的全部结果
    async fn append_results(
        &self,
        job_id: i64,
        results: &[NewJobResult],
    ) -> Result<u64, RepositoryError>;
    /// 根据ID查找任务，包含标签和按发现顺序排列的结果
    async fn find_by_id(&self, id: i64) -> Result<Option<Job>, RepositoryError>;
    /// 列出任务摘要，`owner_id` 为空时列出全部，按ID倒序
    async fn list_jobs(&self, owner_id: Option<i64>) -> Result<Vec<JobSummary>, RepositoryError>;
    /// 删除任务及其结果和标签关联
    async fn delete_job(&self, id: i64) -> Result<(), RepositoryError>;
    /// 替换任务的标签集合，返回新的标签列表
    async fn replace_tags(&self, job_id: i64, tag_ids: &[i64]) -> Result<Vec<Tag>, RepositoryError>;
    /// 分页查询任务结果，按采集时间倒序，返回结果和总数
    async fn find_results_page(
        &self,
        job_id: i64,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<JobResult>, u64), RepositoryError>;
    /// 根据ID查找单条结果
    async fn find_result(&self, id: i64) -> Result<Option<JobResult>, RepositoryError>;
    /// 删除单条结果
    async fn delete_result(&self, id: i64) -> Result<(), RepositoryError>;
    /// 任务总数
    async fn count_jobs(&self) -> Result<u64, RepositoryError>;
}
