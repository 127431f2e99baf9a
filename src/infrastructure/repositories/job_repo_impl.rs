// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;

use crate::domain::models::job::{Job, JobResult, JobSummary, NewJob, NewJobResult};
use crate::domain::models::tag::Tag;
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use crate::infrastructure::database::entities::{job, job_result, job_tag, tag, user};

/// 任务仓库实现
#[derive(Clone)]
pub struct JobRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的任务仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// 去重并过滤掉不存在的标签ID
async fn known_tags<C: ConnectionTrait>(db: &C, tag_ids: &[i64]) -> Result<Vec<Tag>, DbErr> {
    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut ids = tag_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let tags = tag::Entity::find()
        .filter(tag::Column::Id.is_in(ids))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?;
    Ok(tags.into_iter().map(Into::into).collect())
}

async fn link_tags<C: ConnectionTrait>(db: &C, job_id: i64, tags: &[Tag]) -> Result<(), DbErr> {
    if tags.is_empty() {
        return Ok(());
    }
    let links = tags.iter().map(|t| job_tag::ActiveModel {
        job_id: Set(job_id),
        tag_id: Set(t.id),
    });
    job_tag::Entity::insert_many(links)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// 批量加载多个任务的标签
async fn tags_by_job<C: ConnectionTrait>(
    db: &C,
    job_ids: &[i64],
) -> Result<HashMap<i64, Vec<Tag>>, DbErr> {
    let mut map: HashMap<i64, Vec<Tag>> = HashMap::new();
    if job_ids.is_empty() {
        return Ok(map);
    }

    let links = job_tag::Entity::find()
        .filter(job_tag::Column::JobId.is_in(job_ids.to_vec()))
        .all(db)
        .await?;
    if links.is_empty() {
        return Ok(map);
    }

    let tag_ids: Vec<i64> = links.iter().map(|l| l.tag_id).collect();
    let tags: HashMap<i64, Tag> = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.into()))
        .collect();

    for link in links {
        if let Some(tag) = tags.get(&link.tag_id) {
            map.entry(link.job_id).or_default().push(tag.clone());
        }
    }
    for tags in map.values_mut() {
        tags.sort_by(|a, b| a.name.cmp(&b.name));
    }
    Ok(map)
}

async fn usernames<C: ConnectionTrait>(
    db: &C,
    user_ids: Vec<i64>,
) -> Result<HashMap<i64, String>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect())
}

/// 删除任务的结果和标签关联（不删除任务本身）
pub(crate) async fn delete_job_children<C: ConnectionTrait>(
    db: &C,
    job_ids: Vec<i64>,
) -> Result<(), DbErr> {
    if job_ids.is_empty() {
        return Ok(());
    }
    job_result::Entity::delete_many()
        .filter(job_result::Column::JobId.is_in(job_ids.clone()))
        .exec(db)
        .await?;
    job_tag::Entity::delete_many()
        .filter(job_tag::Column::JobId.is_in(job_ids))
        .exec(db)
        .await?;
    Ok(())
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create_job(&self, new_job: &NewJob) -> Result<i64, RepositoryError> {
        let txn = self.db.begin().await?;

        let model = job::ActiveModel {
            target_url: Set(new_job.target_url.clone()),
            css_selector: Set(new_job.css_selector.clone()),
            owner_id: Set(new_job.owner_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let tags = known_tags(&txn, &new_job.tag_ids).await?;
        link_tags(&txn, model.id, &tags).await?;

        txn.commit().await?;
        Ok(model.id)
    }

    async fn append_results(
        &self,
        job_id: i64,
        results: &[NewJobResult],
    ) -> Result<u64, RepositoryError> {
        if results.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await?;
        let models = results.iter().map(|r| job_result::ActiveModel {
            job_id: Set(job_id),
            extracted_text: Set(r.extracted_text.clone()),
            scraped_at: Set(r.scraped_at.into()),
            ..Default::default()
        });
        job_result::Entity::insert_many(models)
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        Ok(results.len() as u64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Job>, RepositoryError> {
        let db = self.db.as_ref();
        let Some(model) = job::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let owner_name = usernames(db, vec![model.owner_id])
            .await?
            .remove(&model.owner_id);
        let tags = tags_by_job(db, &[model.id])
            .await?
            .remove(&model.id)
            .unwrap_or_default();
        let results = job_result::Entity::find()
            .filter(job_result::Column::JobId.eq(model.id))
            .order_by_asc(job_result::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(Some(Job {
            id: model.id,
            target_url: model.target_url,
            css_selector: model.css_selector,
            created_at: model.created_at.into(),
            owner_id: model.owner_id,
            owner_name,
            tags,
            results,
        }))
    }

    async fn list_jobs(&self, owner_id: Option<i64>) -> Result<Vec<JobSummary>, RepositoryError> {
        let db = self.db.as_ref();
        let mut query = job::Entity::find();
        if let Some(owner_id) = owner_id {
            query = query.filter(job::Column::OwnerId.eq(owner_id));
        }
        let jobs = query.order_by_desc(job::Column::Id).all(db).await?;
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let job_ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();
        let mut owner_ids: Vec<i64> = jobs.iter().map(|j| j.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let names = usernames(db, owner_ids).await?;
        let mut tags = tags_by_job(db, &job_ids).await?;
        let counts: HashMap<i64, i64> = job_result::Entity::find()
            .select_only()
            .column(job_result::Column::JobId)
            .column_as(job_result::Column::Id.count(), "result_count")
            .filter(job_result::Column::JobId.is_in(job_ids))
            .group_by(job_result::Column::JobId)
            .into_tuple::<(i64, i64)>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        Ok(jobs
            .into_iter()
            .map(|j| JobSummary {
                id: j.id,
                owner_name: names.get(&j.owner_id).cloned(),
                tags: tags.remove(&j.id).unwrap_or_default(),
                result_count: counts.get(&j.id).copied().unwrap_or(0) as u64,
                target_url: j.target_url,
                css_selector: j.css_selector,
                created_at: j.created_at.into(),
                owner_id: j.owner_id,
            })
            .collect())
    }

    async fn delete_job(&self, id: i64) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        delete_job_children(&txn, vec![id]).await?;
        let deleted = job::Entity::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        txn.commit().await?;
        Ok(())
    }

    async fn replace_tags(&self, job_id: i64, tag_ids: &[i64]) -> Result<Vec<Tag>, RepositoryError> {
        let txn = self.db.begin().await?;
        if job::Entity::find_by_id(job_id).one(&txn).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }

        job_tag::Entity::delete_many()
            .filter(job_tag::Column::JobId.eq(job_id))
            .exec(&txn)
            .await?;
        let tags = known_tags(&txn, tag_ids).await?;
        link_tags(&txn, job_id, &tags).await?;

        txn.commit().await?;
        Ok(tags)
    }

    async fn find_results_page(
        &self,
        job_id: i64,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<JobResult>, u64), RepositoryError> {
        let paginator = job_result::Entity::find()
            .filter(job_result::Column::JobId.eq(job_id))
            .order_by_desc(job_result::Column::ScrapedAt)
            .order_by_desc(job_result::Column::Id)
            .paginate(self.db.as_ref(), page_size.max(1));

        let total = paginator.num_items().await?;
        let page_index = page.saturating_sub(1);
        // Pages whose offset cannot be represented are past the end
        let in_range = page_index
            .checked_mul(page_size.max(1))
            .is_some_and(|offset| offset <= i64::MAX as u64);
        if !in_range {
            return Ok((Vec::new(), total));
        }

        let results = paginator
            .fetch_page(page_index)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok((results, total))
    }

    async fn find_result(&self, id: i64) -> Result<Option<JobResult>, RepositoryError> {
        let model = job_result::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn delete_result(&self, id: i64) -> Result<(), RepositoryError> {
        let deleted = job_result::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if deleted.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_jobs(&self) -> Result<u64, RepositoryError> {
        Ok(job::Entity::find().count(self.db.as_ref()).await?)
    }
}

impl From<job_result::Model> for JobResult {
    fn from(model: job_result::Model) -> Self {
        Self {
            id: model.id,
            job_id: model.job_id,
            extracted_text: model.extracted_text,
            scraped_at: model.scraped_at.into(),
        }
    }
}

#[cfg(test)]
#[path = "job_repo_impl_test.rs"]
mod tests;
