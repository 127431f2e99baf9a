// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_event::JobEvent;

/// 任务通知特质
///
/// 发布是尽力而为、至多一次的，实现不得阻塞调用方
pub trait JobNotifier: Send + Sync {
    /// 向任务频道的当前订阅者发布事件
    fn publish(&self, event: JobEvent);

    fn publish_started(&self, job_id: i64, url: &str) {
        self.publish(JobEvent::Started {
            job_id,
            url: url.to_string(),
        });
    }

    fn publish_result_found(&self, job_id: i64, text: &str, count: usize) {
        self.publish(JobEvent::ResultFound {
            job_id,
            text: text.to_string(),
            count,
        });
    }

    fn publish_completed(&self, job_id: i64, total: usize) {
        self.publish(JobEvent::Completed { job_id, total });
    }

    fn publish_failed(&self, job_id: i64, error: &str) {
        self.publish(JobEvent::Failed {
            job_id,
            error: error.to_string(),
        });
    }
}
