// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

use crate::domain::models::tag::{Tag, TagUsage};
use crate::domain::repositories::job_repository::RepositoryError;
use crate::domain::repositories::tag_repository::TagRepository;
use crate::infrastructure::database::entities::{job_tag, tag};

/// 标签仓库实现
#[derive(Clone)]
pub struct TagRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl TagRepositoryImpl {
    /// 创建新的标签仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for TagRepositoryImpl {
    async fn list_with_usage(&self) -> Result<Vec<TagUsage>, RepositoryError> {
        let db = self.db.as_ref();
        let tags = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await?;

        let counts: HashMap<i64, i64> = job_tag::Entity::find()
            .select_only()
            .column(job_tag::Column::TagId)
            .column_as(job_tag::Column::JobId.count(), "job_count")
            .group_by(job_tag::Column::TagId)
            .into_tuple::<(i64, i64)>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        Ok(tags
            .into_iter()
            .map(|m| TagUsage {
                job_count: counts.get(&m.id).copied().unwrap_or(0) as u64,
                tag: m.into(),
            })
            .collect())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let tags = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(tags.into_iter().map(Into::into).collect())
    }

    async fn create(&self, name: &str, color: &str) -> Result<Tag, RepositoryError> {
        let db = self.db.as_ref();
        let existing = tag::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(tag::Column::Name))).eq(name.to_lowercase()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "Tag '{}' already exists",
                name
            )));
        }

        let model = tag::ActiveModel {
            name: Set(name.to_string()),
            color: Set(color.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                RepositoryError::Conflict(format!("Tag '{}' already exists", name))
            }
            _ => RepositoryError::Database(e),
        })?;

        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        job_tag::Entity::delete_many()
            .filter(job_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = tag::Entity::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        txn.commit().await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(tag::Entity::find().count(self.db.as_ref()).await?)
    }
}

impl From<tag::Model> for Tag {
    fn from(model: tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
        }
    }
}

#[cfg(test)]
#[path = "tag_repo_impl_test.rs"]
mod tests;
