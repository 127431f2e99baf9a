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

use scrapewise::application::bootstrap;
use scrapewise::config::settings::Settings;
use scrapewise::domain::repositories::job_repository::JobRepository;
use scrapewise::domain::repositories::tag_repository::TagRepository;
use scrapewise::domain::repositories::user_repository::UserRepository;
use scrapewise::domain::services::job_pipeline::JobPipeline;
use scrapewise::engines::reqwest_engine::ReqwestEngine;
use scrapewise::infrastructure::database::connection;
use scrapewise::infrastructure::metrics;
use scrapewise::infrastructure::notifications::job_event_hub::JobEventHub;
use scrapewise::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use scrapewise::infrastructure::repositories::tag_repo_impl::TagRepositoryImpl;
use scrapewise::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use scrapewise::presentation::routes::{self, AppServices};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use migration::{Migrator, MigratorTrait};
use scrapewise::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting scrapewise...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Repositories
    let jobs: Arc<dyn JobRepository> = Arc::new(JobRepositoryImpl::new(db.clone()));
    let tags: Arc<dyn TagRepository> = Arc::new(TagRepositoryImpl::new(db.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(UserRepositoryImpl::new(db.clone()));

    bootstrap::ensure_admin(users.as_ref(), &settings.auth).await?;

    // 5. Scraping pipeline
    let hub = Arc::new(JobEventHub::new(settings.notifications.subscriber_buffer));
    let sweeper = hub.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweeper.cleanup();
        }
    });
    let fetcher = Arc::new(ReqwestEngine::new(settings.scraper.user_agent.as_deref())?);
    let pipeline = Arc::new(
        JobPipeline::new(jobs.clone(), fetcher, hub.clone())
            .with_result_delay(Duration::from_millis(settings.scraper.result_delay_ms)),
    );

    let app = routes::build_app(AppServices {
        jobs,
        tags,
        users,
        pipeline,
        hub,
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
