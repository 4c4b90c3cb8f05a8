//! SeaORM storage backend
//!
//! Database storage using SeaORM, supporting SQLite, MySQL/MariaDB,
//! and PostgreSQL.

mod connection;
mod converters;
mod ledger;
mod mutations;
mod query;
pub mod retry;

use std::time::Duration;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::errors::{Result, VistagramError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_post, model_to_share, model_to_user};
pub use ledger::{ShareInsert, is_unique_violation};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(VistagramError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 读操作的重试配置（写事务不重试）
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(VistagramError::database_config(
                "database_url is not set".to_string(),
            ));
        }

        let retry_config = retry::RetryConfig::from(&crate::config::get_config().database);

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 数据库连通性检查
    pub async fn ping(&self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.db.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(VistagramError::database_connection(format!(
                "Database ping failed: {}",
                e
            ))),
            Err(_) => Err(VistagramError::database_connection(format!(
                "Database ping timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }

    /// 关闭连接池
    pub async fn close(&self) {
        if let Err(e) = self.db.clone().close().await {
            warn!("Failed to close database pool: {}", e);
        }
    }
}
