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
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::{Stream, StreamExt};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error};
use validator::Validate;

use crate::application::dto::job_request::{CreateJobRequestDto, UpdateJobTagsRequestDto};
use crate::application::dto::job_response::JobRunResponseDto;
use crate::domain::models::job::{Job, JobSummary};
use crate::domain::models::tag::Tag;
use crate::domain::models::user::{Role, User};
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::access_policy::authorize;
use crate::domain::services::job_pipeline::{JobOutcome, JobPipeline, PipelineError, RunOptions};
use crate::infrastructure::notifications::job_event_hub::JobEventHub;
use crate::presentation::errors::{AppError, RequestError};
use crate::presentation::handlers::account_handler::load_profile;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 加载任务并检查请求者是否为所有者或管理员
pub(crate) async fn load_authorized_job(
    jobs: &dyn JobRepository,
    job_id: i64,
    user: &User,
) -> Result<Job, AppError> {
    let job = jobs
        .find_by_id(job_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    authorize(user, job.owner_id)?;
    Ok(job)
}

fn outcome_status(outcome: &JobOutcome) -> StatusCode {
    match outcome {
        JobOutcome::Completed { .. } => StatusCode::CREATED,
        JobOutcome::NoResults { .. } => StatusCode::OK,
        JobOutcome::Failed { error, .. } => match error {
            PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
            PipelineError::Network(_) | PipelineError::Parse(_) => StatusCode::BAD_GATEWAY,
            PipelineError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// 创建并立即执行一个抓取任务
///
/// 流水线在独立任务中运行，客户端断开不会中断一次运行
pub async fn create_job(
    Extension(pipeline): Extension<Arc<JobPipeline>>,
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateJobRequestDto>,
) -> Result<Response, AppError> {
    if user.role == Role::Guest {
        return Err(RequestError::Forbidden("Guests cannot create scraping jobs.".to_string()).into());
    }
    payload.validate()?;

    let options = RunOptions::from(&load_profile(users.as_ref(), user.id).await?);
    let request = payload.into_new_job(user.id);
    let outcome = tokio::spawn(async move { pipeline.run_with(request, options).await })
        .await
        .map_err(|e| {
            error!("Pipeline task aborted: {}", e);
            anyhow::anyhow!("pipeline task aborted: {}", e)
        })?;

    Ok((outcome_status(&outcome), Json(JobRunResponseDto::from(&outcome))).into_response())
}

/// 列出任务，管理员看到全部，其他用户只看到自己的
pub async fn list_jobs(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<JobSummary>>, AppError> {
    let owner = if user.is_admin() { None } else { Some(user.id) };
    Ok(Json(jobs.list_jobs(owner).await?))
}

pub async fn get_job(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(job_id): Path<i64>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(load_authorized_job(jobs.as_ref(), job_id, &user).await?))
}

pub async fn delete_job(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    load_authorized_job(jobs.as_ref(), job_id, &user).await?;
    jobs.delete_job(job_id).await?;
    debug!(job_id, user_id = user.id, "Job deleted");
    Ok(Json(json!({ "success": true, "message": "Job deleted successfully." })))
}

/// 替换任务的标签集合，未知的标签ID被忽略
pub async fn update_tags(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(job_id): Path<i64>,
    Json(payload): Json<UpdateJobTagsRequestDto>,
) -> Result<Json<Vec<Tag>>, AppError> {
    load_authorized_job(jobs.as_ref(), job_id, &user).await?;
    Ok(Json(jobs.replace_tags(job_id, &payload.tag_ids).await?))
}

/// 任务事件流（Server-Sent Events）
///
/// 只推送订阅之后发布的事件，慢订阅者会跳过丢失的事件
pub async fn job_events(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(hub): Extension<Arc<JobEventHub>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(job_id): Path<i64>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    load_authorized_job(jobs.as_ref(), job_id, &user).await?;

    let events = BroadcastStream::new(hub.subscribe(job_id)).filter_map(|received| async move {
        let event = received.ok()?;
        Event::default()
            .event(event.name())
            .json_data(&event)
            .ok()
            .map(Ok)
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
