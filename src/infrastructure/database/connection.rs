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

use crate::config::settings::DatabaseSettings;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
};
use std::time::Duration;
use tracing::{debug, info};

/// 连接的最长存活时间
const MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// 由配置构造连接选项
pub fn connect_options(settings: &DatabaseSettings) -> ConnectOptions {
    let mut opt = ConnectOptions::new(settings.url.to_owned());

    if let Some(max) = settings.max_connections {
        opt.max_connections(max);
    }
    if let Some(min) = settings.min_connections {
        opt.min_connections(min);
    }
    if let Some(timeout) = settings.connect_timeout {
        opt.connect_timeout(Duration::from_secs(timeout));
        opt.acquire_timeout(Duration::from_secs(timeout));
    }
    if let Some(idle) = settings.idle_timeout {
        opt.idle_timeout(Duration::from_secs(idle));
    }

    opt.max_lifetime(MAX_LIFETIME)
        .sqlx_logging(settings.log_queries);
    opt
}

/// 创建数据库连接池
///
/// SQLite 连接要求外键约束处于开启状态，否则级联删除不会生效
///
/// # 返回值
///
/// * `Ok(DatabaseConnection)` - 数据库连接
/// * `Err(DbErr)` - 连接失败，或 SQLite 外键未开启
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(connect_options(settings)).await?;
    let backend = db.get_database_backend();

    if backend == DbBackend::Sqlite {
        ensure_sqlite_foreign_keys(&db).await?;
    }
    info!(backend = ?backend, "Database pool created");
    Ok(db)
}

async fn ensure_sqlite_foreign_keys(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        "PRAGMA foreign_keys = ON",
    ))
    .await?;

    let enabled = db
        .query_one(Statement::from_string(DbBackend::Sqlite, "PRAGMA foreign_keys"))
        .await?
        .map(|row| row.try_get_by_index::<i32>(0))
        .transpose()?
        .unwrap_or(0);
    debug!(enabled, "SQLite foreign key enforcement");

    if enabled == 1 {
        Ok(())
    } else {
        Err(DbErr::Custom(
            "SQLite foreign key enforcement could not be enabled".to_string(),
        ))
    }
}
