// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics::describe_histogram;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

/// 初始化 Prometheus 指标导出
///
/// 未启用时不安装记录器，所有指标宏变为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address '{}': {}", settings.listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!("scrape_jobs_started_total", "Jobs accepted by the pipeline");
    describe_counter!("scrape_jobs_completed_total", "Jobs that finished successfully");
    describe_counter!("scrape_jobs_failed_total", "Jobs that ended in failure");
    describe_counter!("scrape_results_total", "Extracted results persisted");
    describe_counter!("job_events_published_total", "Job events published to subscribers");
    describe_histogram!("scrape_job_duration_seconds", "Wall time of one pipeline run");

    info!("Metrics exporter listening on {}", addr);
}
