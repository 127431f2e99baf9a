// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::models::tag::Tag;

/// 抓取任务实体
///
/// 一个持久化的抓取请求：抓取一个URL，并用一个选择器提取文本。
/// 每次流水线运行恰好创建一次，创建后除标签重新分配和删除外不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// 任务唯一标识符，由存储层在创建时分配
    pub id: i64,
    /// 目标URL
    pub target_url: String,
    /// 简化的选择器字符串
    pub css_selector: String,
    /// 创建时间（UTC）
    pub created_at: DateTime<Utc>,
    /// 所属用户ID
    pub owner_id: i64,
    /// 所属用户名，仅在查询时填充
    pub owner_name: Option<String>,
    /// 关联的标签（无序）
    pub tags: Vec<Tag>,
    /// 提取结果，按发现顺序排列
    pub results: Vec<JobResult>,
}

/// 抓取结果实体
///
/// 任务提取出的一段文本，创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    /// 结果唯一标识符
    pub id: i64,
    /// 所属任务ID
    pub job_id: i64,
    /// 提取出的文本（已去除首尾空白，非空）
    pub extracted_text: String,
    /// 采集时间（UTC）
    pub scraped_at: DateTime<Utc>,
}

/// 待创建的任务
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub target_url: String,
    pub css_selector: String,
    pub owner_id: i64,
    pub tag_ids: Vec<i64>,
}

/// 待写入的结果，写入前尚无ID
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobResult {
    pub extracted_text: String,
    pub scraped_at: DateTime<Utc>,
}

impl NewJobResult {
    pub fn captured_now(extracted_text: String) -> Self {
        Self {
            extracted_text,
            scraped_at: Utc::now(),
        }
    }
}

/// 任务摘要，用于列表展示
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: i64,
    pub target_url: String,
    pub css_selector: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: i64,
    pub owner_name: Option<String>,
    pub tags: Vec<Tag>,
    pub result_count: u64,
}

/// 单次运行的状态
///
/// 状态转换遵循以下流程：
/// Created → Fetching → Extracting → Persisting → Completed
/// 前四个状态中任意一个都可以转到 Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Created,
    Fetching,
    Extracting,
    Persisting,
    Completed,
    Failed,
}

/// 运行状态错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunStateError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: RunState, to: RunState },
}

impl RunState {
    /// 是否为终止状态
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }

    /// 转换到下一个状态
    ///
    /// # 返回值
    ///
    /// * `Ok(RunState)` - 新状态
    /// * `Err(RunStateError)` - 转换不符合状态机规则
    pub fn transition(self, next: RunState) -> Result<RunState, RunStateError> {
        let allowed = matches!(
            (self, next),
            (RunState::Created, RunState::Fetching)
                | (RunState::Fetching, RunState::Extracting)
                | (RunState::Extracting, RunState::Persisting)
                | (RunState::Persisting, RunState::Completed)
        ) || (!self.is_terminal() && next == RunState::Failed);

        if allowed {
            Ok(next)
        } else {
            Err(RunStateError::InvalidStateTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunState::Created => write!(f, "created"),
            RunState::Fetching => write!(f, "fetching"),
            RunState::Extracting => write!(f, "extracting"),
            RunState::Persisting => write!(f, "persisting"),
            RunState::Completed => write!(f, "completed"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}
