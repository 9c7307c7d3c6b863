//! Analytics 相关的数据库查询
//!
//! 仪表盘与点击统计在内存中聚合，这里只负责按范围加载数据。

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::converters::model_to_hostel;
use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::models::Hostel;

use migration::entities::hostel;

impl SeaOrmStorage {
    /// 加载酒店用于统计
    ///
    /// - `active_only`: 只包含已上架的
    /// - `created_after`: created_at >= 该时间
    pub async fn load_hostels_for_analytics(
        &self,
        active_only: bool,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Hostel>> {
        let db = &self.db;
        let models = retry::with_retry("load_hostels_for_analytics", self.retry_config, || async {
            let mut query = hostel::Entity::find();
            if active_only {
                query = query.filter(hostel::Column::IsActive.eq(true));
            }
            if let Some(after) = created_after {
                query = query.filter(hostel::Column::CreatedAt.gte(after));
            }
            query
                .order_by_desc(hostel::Column::CreatedAt)
                .order_by_asc(hostel::Column::Id)
                .all(db)
                .await
        })
        .await?;

        Ok(models.into_iter().map(model_to_hostel).collect())
    }
}
