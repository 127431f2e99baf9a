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

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::models::job::{NewJob, NewJobResult, RunState};
use crate::domain::models::profile::UserProfile;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::services::extractor::Extractor;
use crate::domain::services::notifier::JobNotifier;
use crate::domain::services::selector::SelectorQuery;
use crate::engines::traits::{DocumentFetcher, FetchError, FetchOptions};

/// 字段级校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 流水线错误类型
///
/// 所有错误都在流水线边界被捕获，转换为面向用户的消息和失败通知
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// 缺少必填字段，在任何副作用之前报告
    #[error("Validation error: {}", join_fields(.0))]
    Validation(Vec<FieldError>),
    /// 抓取失败
    #[error("Network error: {0}")]
    Network(String),
    /// 响应不能作为文档解析
    #[error("Parse error: {0}")]
    Parse(String),
    /// 其他错误（存储失败、状态机错误等）
    #[error("{0}")]
    Unexpected(String),
}

impl From<FetchError> for PipelineError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(msg) => PipelineError::Network(msg),
            FetchError::Parse(msg) => PipelineError::Parse(msg),
        }
    }
}

/// 单次运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// 运行完成并保存了结果
    Completed { job_id: i64, result_count: usize },
    /// 运行完成但没有匹配结果，任务仍被保存
    NoResults { job_id: i64 },
    /// 运行失败，`job_id` 为空表示任务未被创建
    Failed {
        job_id: Option<i64>,
        error: PipelineError,
    },
}

impl JobOutcome {
    pub fn job_id(&self) -> Option<i64> {
        match self {
            JobOutcome::Completed { job_id, .. } | JobOutcome::NoResults { job_id } => {
                Some(*job_id)
            }
            JobOutcome::Failed { job_id, .. } => *job_id,
        }
    }

    pub fn result_count(&self) -> usize {
        match self {
            JobOutcome::Completed { result_count, .. } => *result_count,
            _ => 0,
        }
    }

    /// 面向用户的消息
    pub fn message(&self) -> String {
        match self {
            JobOutcome::Completed { result_count, .. } => format!(
                "Scraping job created successfully with {} results.",
                result_count
            ),
            JobOutcome::NoResults { .. } => {
                "No results found for the given selector. The job was saved for your records."
                    .to_string()
            }
            JobOutcome::Failed { error, .. } => match error {
                PipelineError::Validation(_) => "Please provide both URL and selector.".to_string(),
                PipelineError::Network(msg) => format!(
                    "Failed to access the website: {}. Please check the URL and try again.",
                    msg
                ),
                PipelineError::Parse(msg) => {
                    format!("Failed to read the website as an HTML document: {}.", msg)
                }
                PipelineError::Unexpected(msg) => {
                    format!("Error occurred while creating the job: {}", msg)
                }
            },
        }
    }
}

/// 校验创建请求，URL 和选择器都不能为空白
pub fn validate_request(request: &NewJob) -> Result<(), PipelineError> {
    let mut fields = Vec::new();
    if request.target_url.trim().is_empty() {
        fields.push(FieldError {
            field: "targetUrl",
            message: "targetUrl is required".to_string(),
        });
    }
    if request.css_selector.trim().is_empty() {
        fields.push(FieldError {
            field: "cssSelector",
            message: "cssSelector is required".to_string(),
        });
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Validation(fields))
    }
}

/// 单次运行的覆盖项，未设置的字段使用流水线的全局配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub user_agent: Option<String>,
    pub result_delay: Option<Duration>,
}

impl From<&UserProfile> for RunOptions {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_agent: profile.user_agent.clone(),
            result_delay: (profile.delay_between_requests_ms > 0)
                .then(|| Duration::from_millis(profile.delay_between_requests_ms)),
        }
    }
}

/// 任务执行流水线
///
/// 按顺序执行 创建 → 抓取 → 提取 → 持久化 → 通知。
/// 任务行先单独提交以获得ID，全部结果在运行结束时一次性写入。
pub struct JobPipeline {
    jobs: Arc<dyn JobRepository>,
    fetcher: Arc<dyn DocumentFetcher>,
    notifier: Arc<dyn JobNotifier>,
    result_delay: Duration,
}

impl JobPipeline {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        fetcher: Arc<dyn DocumentFetcher>,
        notifier: Arc<dyn JobNotifier>,
    ) -> Self {
        Self {
            jobs,
            fetcher,
            notifier,
            result_delay: Duration::ZERO,
        }
    }

    /// 设置每条结果之间的人工延迟，仅用于演示进度
    pub fn with_result_delay(mut self, delay: Duration) -> Self {
        self.result_delay = delay;
        self
    }

    /// 使用全局配置运行一次任务
    pub async fn run(&self, request: NewJob) -> JobOutcome {
        self.run_with(request, RunOptions::default()).await
    }

    /// 运行一次任务
    ///
    /// 从不返回错误：所有失败都转换为 `JobOutcome::Failed` 并发布失败通知
    pub async fn run_with(&self, request: NewJob, options: RunOptions) -> JobOutcome {
        let request = NewJob {
            target_url: request.target_url.trim().to_string(),
            css_selector: request.css_selector.trim().to_string(),
            ..request
        };

        if let Err(error) = validate_request(&request) {
            warn!("Rejected job request: {}", error);
            return JobOutcome::Failed {
                job_id: None,
                error,
            };
        }

        let started = Instant::now();
        counter!("scrape_jobs_started_total").increment(1);

        let job_id = match self.jobs.create_job(&request).await {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to create job for {}: {}", request.target_url, e);
                let error = PipelineError::Unexpected(e.to_string());
                self.notifier.publish_failed(0, &error.to_string());
                counter!("scrape_jobs_failed_total").increment(1);
                return JobOutcome::Failed {
                    job_id: None,
                    error,
                };
            }
        };

        info!(job_id, url = %request.target_url, selector = %request.css_selector, "Job created");
        self.notifier.publish_started(job_id, &request.target_url);

        let mut state = RunState::Created;
        let outcome = match self.execute(job_id, &request, &options, &mut state).await {
            Ok(0) => JobOutcome::NoResults { job_id },
            Ok(result_count) => JobOutcome::Completed {
                job_id,
                result_count,
            },
            Err(error) => {
                warn!(job_id, state = %state, "Job failed: {}", error);
                // Failed is reachable from every non-terminal state
                state = RunState::Failed;
                self.notifier.publish_failed(job_id, &error.to_string());
                counter!("scrape_jobs_failed_total").increment(1);
                JobOutcome::Failed {
                    job_id: Some(job_id),
                    error,
                }
            }
        };

        histogram!("scrape_job_duration_seconds").record(started.elapsed().as_secs_f64());
        debug!(job_id, state = %state, "Job run finished");
        outcome
    }

    async fn execute(
        &self,
        job_id: i64,
        request: &NewJob,
        options: &RunOptions,
        state: &mut RunState,
    ) -> Result<usize, PipelineError> {
        advance(state, RunState::Fetching, job_id)?;
        let fetch_options = FetchOptions {
            user_agent: options.user_agent.clone(),
        };
        let document = self
            .fetcher
            .fetch(&request.target_url, &fetch_options)
            .await?;
        let result_delay = options.result_delay.unwrap_or(self.result_delay);

        advance(state, RunState::Extracting, job_id)?;
        let query = SelectorQuery::translate(&request.css_selector);
        debug!(job_id, query = %query, "Running query");
        let snippets = Extractor::extract_from_html(&document.body, &query);

        let mut buffer: Vec<NewJobResult> = Vec::with_capacity(snippets.len());
        for text in snippets {
            self.notifier
                .publish_result_found(job_id, &text, buffer.len() + 1);
            buffer.push(NewJobResult::captured_now(text));

            if !result_delay.is_zero() {
                tokio::time::sleep(result_delay).await;
            }
        }

        advance(state, RunState::Persisting, job_id)?;
        if !buffer.is_empty() {
            self.jobs
                .append_results(job_id, &buffer)
                .await
                .map_err(|e| PipelineError::Unexpected(e.to_string()))?;
            counter!("scrape_results_total").increment(buffer.len() as u64);
        }

        advance(state, RunState::Completed, job_id)?;
        self.notifier.publish_completed(job_id, buffer.len());
        counter!("scrape_jobs_completed_total").increment(1);
        info!(job_id, results = buffer.len(), "Job completed");

        Ok(buffer.len())
    }
}

fn advance(state: &mut RunState, next: RunState, job_id: i64) -> Result<(), PipelineError> {
    *state = state
        .transition(next)
        .map_err(|e| PipelineError::Unexpected(e.to_string()))?;
    debug!(job_id, state = %state, "Job state changed");
    Ok(())
}

#[cfg(test)]
#[path = "job_pipeline_test.rs"]
mod tests;
