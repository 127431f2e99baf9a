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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、数据库、抓取、通知、认证和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 抓取配置
    pub scraper: ScraperSettings,
    /// 实时通知配置
    pub notifications: NotificationSettings,
    /// 认证配置
    pub auth: AuthSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 是否记录每条 SQL 语句
    #[serde(default)]
    pub log_queries: bool,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScraperSettings {
    /// 每条结果之间的人工延迟（毫秒），0 表示不延迟
    pub result_delay_ms: u64,
    /// 自定义 User-Agent，不设置时使用客户端默认值
    pub user_agent: Option<String>,
}

/// 实时通知配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    /// 每个订阅者的事件缓冲区大小
    pub subscriber_buffer: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            subscriber_buffer: 64,
        }
    }
}

/// 认证配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// 启动时是否创建管理员账号
    pub seed_admin: bool,
    /// 管理员邮箱
    pub admin_email: String,
    /// 管理员初始密码
    pub admin_password: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、配置文件和 `SCRAPEWISE__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://scrapewise.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.log_queries", false)?
            .set_default("scraper.result_delay_ms", 0)?
            .set_default("notifications.subscriber_buffer", 64)?
            .set_default("auth.seed_admin", true)?
            .set_default("auth.admin_email", "admin@scrapewise.com")?
            .set_default("auth.admin_password", "Admin123!")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SCRAPEWISE").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
