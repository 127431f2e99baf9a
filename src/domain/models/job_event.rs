// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// 任务生命周期事件
///
/// 通过任务频道推送给订阅者，序列化后带有 `type` 字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    /// 任务开始抓取
    Started { job_id: i64, url: String },
    /// 找到一条新结果，`count` 为当前累计数量
    ResultFound {
        job_id: i64,
        text: String,
        count: usize,
    },
    /// 任务完成，`total` 为结果总数
    Completed { job_id: i64, total: usize },
    /// 任务失败
    Failed { job_id: i64, error: String },
}

impl JobEvent {
    pub fn job_id(&self) -> i64 {
        match self {
            JobEvent::Started { job_id, .. }
            | JobEvent::ResultFound { job_id, .. }
            | JobEvent::Completed { job_id, .. }
            | JobEvent::Failed { job_id, .. } => *job_id,
        }
    }

    /// SSE 事件名
    pub fn name(&self) -> &'static str {
        match self {
            JobEvent::Started { .. } => "JobStarted",
            JobEvent::ResultFound { .. } => "NewResult",
            JobEvent::Completed { .. } => "JobCompleted",
            JobEvent::Failed { .. } => "JobFailed",
        }
    }
}

/// 任务频道名称
pub fn channel_name(job_id: i64) -> String {
    format!("job_{}", job_id)
}
