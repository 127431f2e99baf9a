// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use metrics::counter;
use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::models::job_event::{channel_name, JobEvent};
use crate::domain::services::notifier::JobNotifier;

/// 进程内的任务事件中心
///
/// 每个任务频道（`job_{id}`）对应一个广播通道。
/// 发布不阻塞：没有订阅者时事件被丢弃，慢订阅者可能丢失事件。
pub struct JobEventHub {
    channels: DashMap<String, broadcast::Sender<JobEvent>>,
    capacity: usize,
}

impl JobEventHub {
    /// 创建事件中心
    ///
    /// # 参数
    ///
    /// * `capacity` - 每个频道为每个订阅者缓存的事件数
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// 订阅任务频道，频道不存在时创建
    pub fn subscribe(&self, job_id: i64) -> broadcast::Receiver<JobEvent> {
        self.channels
            .entry(channel_name(job_id))
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self, job_id: i64) -> usize {
        self.channels
            .get(&channel_name(job_id))
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// 移除没有订阅者的频道
    pub fn cleanup(&self) {
        self.channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for JobEventHub {
    fn default() -> Self {
        Self::new(64)
    }
}

impl JobNotifier for JobEventHub {
    fn publish(&self, event: JobEvent) {
        let channel = channel_name(event.job_id());
        counter!("job_events_published_total", "event" => event.name()).increment(1);

        let delivered = match self.channels.get(&channel) {
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        };
        trace!(channel = %channel, delivered, "Published job event");
    }
}
