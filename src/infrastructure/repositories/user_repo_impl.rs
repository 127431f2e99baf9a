// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;

use crate::domain::models::profile::UserProfile;
use crate::domain::models::user::{NewUser, User};
use crate::domain::repositories::job_repository::RepositoryError;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::database::entities::{job, user, user_profile};
use crate::infrastructure::repositories::job_repo_impl::delete_job_children;

/// 用户仓库实现
#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    /// 创建新的用户仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        if self.find_by_email(&new_user.email).await?.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "Email '{}' is already registered",
                new_user.email
            )));
        }

        let model = user::ActiveModel {
            username: Set(new_user.username.clone()),
            email: Set(new_user.email.clone()),
            password_hash: Set(new_user.password_hash.clone()),
            role: Set(new_user.role.to_string()),
            is_active: Set(true),
            api_key: Set(new_user.api_key.clone()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => RepositoryError::Conflict(msg),
            _ => RepositoryError::Database(e),
        })?;

        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let model = user::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, RepositoryError> {
        let model = user::Entity::find()
            .filter(user::Column::ApiKey.eq(api_key))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<User, RepositoryError> {
        let db = self.db.as_ref();
        let model = user::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: user::ActiveModel = model.into();
        active.is_active = Set(is_active);
        let updated = active.update(db).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let job_ids: Vec<i64> = job::Entity::find()
            .select_only()
            .column(job::Column::Id)
            .filter(job::Column::OwnerId.eq(id))
            .into_tuple::<i64>()
            .all(&txn)
            .await?;
        delete_job_children(&txn, job_ids).await?;
        job::Entity::delete_many()
            .filter(job::Column::OwnerId.eq(id))
            .exec(&txn)
            .await?;

        user_profile::Entity::delete_by_id(id).exec(&txn).await?;
        let deleted = user::Entity::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        txn.commit().await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(user::Entity::find().count(self.db.as_ref()).await?)
    }

    async fn find_profile(&self, user_id: i64) -> Result<Option<UserProfile>, RepositoryError> {
        let model = user_profile::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<UserProfile, RepositoryError> {
        let db = self.db.as_ref();
        if user::Entity::find_by_id(profile.user_id).one(db).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let delay = i64::try_from(profile.delay_between_requests_ms).map_err(|_| {
            RepositoryError::Conflict(format!(
                "Delay {}ms is out of range",
                profile.delay_between_requests_ms
            ))
        })?;
        let active = user_profile::ActiveModel {
            user_id: Set(profile.user_id),
            display_name: Set(profile.display_name.clone()),
            avatar_url: Set(profile.avatar_url.clone()),
            user_agent: Set(profile.user_agent.clone()),
            delay_between_requests_ms: Set(delay),
            updated_at: Set(Utc::now().into()),
        };

        let saved = if user_profile::Entity::find_by_id(profile.user_id)
            .one(db)
            .await?
            .is_some()
        {
            active.update(db).await?
        } else {
            active.insert(db).await?
        };
        Ok(saved.into())
    }
}

impl From<user_profile::Model> for UserProfile {
    fn from(model: user_profile::Model) -> Self {
        Self {
            user_id: model.user_id,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            user_agent: model.user_agent,
            delay_between_requests_ms: u64::try_from(model.delay_between_requests_ms)
                .unwrap_or_default(),
        }
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            role: model.role.parse().unwrap_or_default(),
            is_active: model.is_active,
            api_key: model.api_key,
            created_at: model.created_at.into(),
        }
    }
}

#[cfg(test)]
#[path = "user_repo_impl_test.rs"]
mod tests;
