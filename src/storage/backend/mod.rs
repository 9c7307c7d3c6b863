//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod admin_store;
mod analytics;
mod connection;
mod converters;
mod hostel_mutations;
mod hostel_query;
pub mod retry;

use std::str::FromStr;
use std::time::Duration;

use moka::sync::Cache;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::errors::{NepstayError, Result};

pub use admin_store::normalize_email;
pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{hostel_to_active_model, model_to_admin, model_to_hostel};

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
        Err(NepstayError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        other => other.to_string(),
    }
}

/// 可排序字段（白名单）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Clicks,
    Price,
    CreatedAt,
}

/// 排序规则：字段 + 方向，字符串形式为 `clicks` / `-clicks`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostelSort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for HostelSort {
    fn default() -> Self {
        Self {
            field: SortField::Clicks,
            descending: true,
        }
    }
}

impl FromStr for HostelSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (descending, key) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = match key {
            "clicks" => SortField::Clicks,
            "price" => SortField::Price,
            "createdAt" => SortField::CreatedAt,
            _ => {
                return Err(
                    "sortBy must be one of [clicks, price, createdAt, -clicks, -price, -createdAt]"
                        .to_string(),
                );
            }
        };
        Ok(Self { field, descending })
    }
}

impl std::fmt::Display for HostelSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self.field {
            SortField::Clicks => "clicks",
            SortField::Price => "price",
            SortField::CreatedAt => "createdAt",
        };
        if self.descending {
            write!(f, "-{}", key)
        } else {
            f.write_str(key)
        }
    }
}

/// 酒店过滤条件（始终只查 is_active = true）
#[derive(Default, Clone, Debug)]
pub struct HostelFilter {
    /// 模糊匹配名称、地址、城市、区域、设施
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// 任一设施子串匹配即可（OR）
    pub facilities: Vec<String>,
    pub featured: Option<bool>,
    /// created_at >= created_after
    pub created_after: Option<chrono::DateTime<chrono::Utc>>,
}

impl HostelFilter {
    /// COUNT 缓存 key
    fn cache_key(&self) -> String {
        format!(
            "count:s={:?}:min={:?}:max={:?}:f={:?}:ft={:?}:a={:?}",
            self.search,
            self.min_price,
            self.max_price,
            self.facilities,
            self.featured,
            self.created_after.map(|d| d.timestamp_millis())
        )
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 分页 COUNT 缓存（TTL 30秒）
    count_cache: Cache<String, u64>,
    /// 重试配置
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(NepstayError::database_config("DATABASE_URL is not set"));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig {
            max_retries: config.database.retry_count,
            base_delay_ms: config.database.retry_base_delay_ms,
            max_delay_ms: config.database.retry_max_delay_ms,
        };

        let backend_name = normalize_backend_name(backend_name);
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, &backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name,
            count_cache: Cache::builder()
                .time_to_live(Duration::from_secs(30))
                .max_capacity(100)
                .build(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
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

    /// 连通性检查
    pub async fn ping(&self) -> bool {
        self.db.ping().await.is_ok()
    }

    pub async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| NepstayError::database_connection(format!("Failed to close: {}", e)))?;
        info!("{} connection pool closed", self.backend_name.to_uppercase());
        Ok(())
    }

    /// 清除分页 COUNT 缓存（数据变更时调用）
    pub fn invalidate_count_cache(&self) {
        self.count_cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://data.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("hostels.db").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("postgres://u:p@localhost/nepstay").unwrap(),
            "postgres"
        );
        assert_eq!(infer_backend_from_url("mariadb://localhost/db").unwrap(), "mysql");
        assert!(infer_backend_from_url("mongodb://localhost").is_err());
    }

    #[test]
    fn test_sort_parsing() {
        let sort: HostelSort = "-clicks".parse().unwrap();
        assert_eq!(sort, HostelSort::default());

        let sort: HostelSort = "price".parse().unwrap();
        assert_eq!(sort.field, SortField::Price);
        assert!(!sort.descending);

        let sort: HostelSort = "-createdAt".parse().unwrap();
        assert_eq!(sort.to_string(), "-createdAt");

        assert!("name".parse::<HostelSort>().is_err());
        assert!("--price".parse::<HostelSort>().is_err());
    }

    #[test]
    fn test_filter_cache_key_differs() {
        let a = HostelFilter {
            search: Some("thamel".into()),
            ..Default::default()
        };
        let b = HostelFilter {
            facilities: vec!["wifi".into()],
            ..Default::default()
        };
        assert_ne!(a.cache_key(), b.cache_key());
    }
}
