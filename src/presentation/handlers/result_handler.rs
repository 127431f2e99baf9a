// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Path, Query},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::application::dto::job_request::ResultsQueryDto;
use crate::application::dto::job_response::PagedResultsDto;
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use crate::domain::services::access_policy::authorize;
use crate::domain::services::export::{self, ExportFormat};
use crate::presentation::errors::AppError;
use crate::presentation::handlers::job_handler::load_authorized_job;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 分页查询任务结果，按采集时间倒序
pub async fn list_results(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(job_id): Path<i64>,
    Query(query): Query<ResultsQueryDto>,
) -> Result<Json<PagedResultsDto>, AppError> {
    query.validate()?;
    load_authorized_job(jobs.as_ref(), job_id, &user).await?;

    let (page, page_size) = (query.page(), query.page_size());
    let (results, total) = jobs.find_results_page(job_id, page, page_size).await?;
    Ok(Json(PagedResultsDto::new(
        job_id, results, page, page_size, total,
    )))
}

fn attachment(format: ExportFormat, file_name: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn export_csv(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(job_id): Path<i64>,
) -> Result<Response, AppError> {
    let job = load_authorized_job(jobs.as_ref(), job_id, &user).await?;
    let file_name = export::export_file_name(job.id, ExportFormat::Csv, Utc::now());
    info!(job_id, results = job.results.len(), "Exporting results as CSV");
    Ok(attachment(ExportFormat::Csv, file_name, export::to_csv(&job)?))
}

pub async fn export_json(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(job_id): Path<i64>,
) -> Result<Response, AppError> {
    let job = load_authorized_job(jobs.as_ref(), job_id, &user).await?;
    let now = Utc::now();
    let body = serde_json::to_string_pretty(&export::to_json_export(&job, &user.username, now))?;
    let file_name = export::export_file_name(job.id, ExportFormat::Json, now);
    info!(job_id, results = job.results.len(), "Exporting results as JSON");
    Ok(attachment(ExportFormat::Json, file_name, body))
}

/// 删除单条结果，需要是所属任务的所有者或管理员
pub async fn delete_result(
    Extension(jobs): Extension<Arc<dyn JobRepository>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(result_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = jobs
        .find_result(result_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    let job = jobs
        .find_by_id(result.job_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    authorize(&user, job.owner_id)?;

    jobs.delete_result(result_id).await?;
    Ok(Json(json!({ "success": true, "message": "Result deleted successfully." })))
}
