// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

use crate::domain::models::job::JobResult;
use crate::domain::services::job_pipeline::{FieldError, JobOutcome, PipelineError};

/// 创建任务的响应
#[derive(Debug, Serialize)]
pub struct JobRunResponseDto {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i64>,
    pub result_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl From<&JobOutcome> for JobRunResponseDto {
    fn from(outcome: &JobOutcome) -> Self {
        let errors = match outcome {
            JobOutcome::Failed {
                error: PipelineError::Validation(fields),
                ..
            } => Some(fields.clone()),
            _ => None,
        };
        Self {
            success: !matches!(outcome, JobOutcome::Failed { .. }),
            message: outcome.message(),
            job_id: outcome.job_id(),
            result_count: outcome.result_count(),
            errors,
        }
    }
}

/// 分页的结果列表
#[derive(Debug, Serialize)]
pub struct PagedResultsDto {
    pub job_id: i64,
    pub results: Vec<JobResult>,
    pub page: u64,
    pub page_size: u64,
    pub total_results: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PagedResultsDto {
    pub fn new(
        job_id: i64,
        results: Vec<JobResult>,
        page: u64,
        page_size: u64,
        total_results: u64,
    ) -> Self {
        let total_pages = total_results.div_ceil(page_size.max(1));
        Self {
            job_id,
            results,
            page,
            page_size,
            total_results,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
        }
    }
}
