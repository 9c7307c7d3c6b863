//! Hostel read operations for SeaOrmStorage
//!
//! 搜索/过滤/分页查询构建，以及按 id / slug 的单条查询。

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, ExprTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
    sea_query::{Expr, Func, LikeExpr},
};
use tracing::debug;

use super::converters::{model_to_hostel, normalize_facility};
use super::{HostelFilter, HostelSort, SeaOrmStorage, SortField, retry};
use crate::errors::Result;
use crate::storage::models::{Hostel, Pagination};

use migration::entities::hostel;

/// 转义 LIKE 通配符
pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// LOWER(col) LIKE '%term%'（大小写不敏感的子串匹配）
fn ci_contains(column: hostel::Column, term: &str) -> Expr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// facility_tags LIKE '%term%'：检索词不含分隔符，只能落在单个标签内
///
/// facility_tags 写入时已小写，不再套 LOWER
fn facility_contains(term: &str) -> Expr {
    let pattern = format!("%{}%", escape_like(&normalize_facility(term)));
    Expr::col(hostel::Column::FacilityTags).like(LikeExpr::new(pattern).escape('\\'))
}

/// 将过滤条件转换为 WHERE 子句
pub(crate) fn build_condition(filter: &HostelFilter) -> Condition {
    let mut condition = Condition::all().add(hostel::Column::IsActive.eq(true));

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(ci_contains(hostel::Column::Name, search))
                .add(ci_contains(hostel::Column::LocationAddress, search))
                .add(ci_contains(hostel::Column::LocationCity, search))
                .add(ci_contains(hostel::Column::LocationArea, search))
                .add(facility_contains(search)),
        );
    }

    if let Some(min) = filter.min_price {
        condition = condition.add(hostel::Column::PricePerNight.gte(min));
    }

    if let Some(max) = filter.max_price {
        condition = condition.add(hostel::Column::PricePerNight.lte(max));
    }

    if !filter.facilities.is_empty() {
        let any_facility = filter
            .facilities
            .iter()
            .fold(Condition::any(), |cond, term| {
                cond.add(facility_contains(term))
            });
        condition = condition.add(any_facility);
    }

    if let Some(featured) = filter.featured {
        condition = condition.add(hostel::Column::Featured.eq(featured));
    }

    if let Some(after) = filter.created_after {
        condition = condition.add(hostel::Column::CreatedAt.gte(after));
    }

    condition
}

/// 应用排序；created_at DESC 作为次级排序，id 保证分页稳定
pub(crate) fn apply_sort(query: Select<hostel::Entity>, sort: HostelSort) -> Select<hostel::Entity> {
    let order = if sort.descending {
        Order::Desc
    } else {
        Order::Asc
    };

    let query = match sort.field {
        SortField::Clicks => query
            .order_by(hostel::Column::Clicks, order)
            .order_by_desc(hostel::Column::CreatedAt),
        SortField::Price => query
            .order_by(hostel::Column::PricePerNight, order)
            .order_by_desc(hostel::Column::CreatedAt),
        SortField::CreatedAt => query.order_by(hostel::Column::CreatedAt, order),
    };

    query.order_by_asc(hostel::Column::Id)
}

impl SeaOrmStorage {
    /// 带过滤条件的分页查询（带 COUNT 缓存）
    ///
    /// 返回 (当前页数据, 匹配总数)，超出范围的页返回空列表
    pub async fn search_hostels(
        &self,
        filter: &HostelFilter,
        sort: HostelSort,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Hostel>, u64)> {
        let condition = build_condition(filter);
        let cache_key = filter.cache_key();
        let db = &self.db;

        let total = if let Some(cached) = self.count_cache.get(&cache_key) {
            debug!("count cache hit: key={}, value={}", cache_key, cached);
            cached
        } else {
            let count = retry::with_retry("search_hostels(count)", self.retry_config, || async {
                hostel::Entity::find()
                    .filter(condition.clone())
                    .count(db)
                    .await
            })
            .await?;
            self.count_cache.insert(cache_key, count);
            count
        };

        // 超出总数（或偏移量溢出）的页直接返回空列表
        let Some(offset) = Pagination::offset(page, limit).filter(|offset| *offset < total) else {
            return Ok((Vec::new(), total));
        };

        let models = retry::with_retry("search_hostels(data)", self.retry_config, || async {
            apply_sort(hostel::Entity::find().filter(condition.clone()), sort)
                .offset(offset)
                .limit(limit)
                .all(db)
                .await
        })
        .await?;

        Ok((models.into_iter().map(model_to_hostel).collect(), total))
    }

    /// 按主键查询（不区分是否上架）
    pub async fn find_hostel_by_id(&self, id: &str) -> Result<Option<Hostel>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("find_hostel_by_id({})", id), self.retry_config, || async {
            hostel::Entity::find_by_id(id.to_string()).one(db).await
        })
        .await?;

        Ok(model.map(model_to_hostel))
    }

    /// 按 slug 查询已上架的酒店
    pub async fn find_active_hostel_by_slug(&self, slug: &str) -> Result<Option<Hostel>> {
        let db = &self.db;
        let model = retry::with_retry("find_active_hostel_by_slug", self.retry_config, || async {
            hostel::Entity::find()
                .filter(hostel::Column::Slug.eq(slug))
                .filter(hostel::Column::IsActive.eq(true))
                .one(db)
                .await
        })
        .await?;

        Ok(model.map(model_to_hostel))
    }

    /// 热门 / 推荐榜单：clicks DESC, created_at DESC
    pub async fn top_hostels(&self, featured_only: bool, limit: u64) -> Result<Vec<Hostel>> {
        let db = &self.db;
        let models = retry::with_retry("top_hostels", self.retry_config, || async {
            let mut query = hostel::Entity::find().filter(hostel::Column::IsActive.eq(true));
            if featured_only {
                query = query.filter(hostel::Column::Featured.eq(true));
            }
            query
                .order_by_desc(hostel::Column::Clicks)
                .order_by_desc(hostel::Column::CreatedAt)
                .limit(limit)
                .all(db)
                .await
        })
        .await?;

        Ok(models.into_iter().map(model_to_hostel).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql_for(filter: &HostelFilter, sort: HostelSort) -> String {
        apply_sort(hostel::Entity::find().filter(build_condition(filter)), sort)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("wifi"), "wifi");
    }

    #[test]
    fn test_default_filter_only_restricts_active() {
        let sql = sql_for(&HostelFilter::default(), HostelSort::default());
        assert!(sql.contains(r#""is_active" = TRUE"#) || sql.contains(r#""is_active" = 1"#));
        assert!(!sql.contains("LIKE"));
        assert!(sql.contains(r#"ORDER BY "hostels"."clicks" DESC, "hostels"."created_at" DESC"#));
    }

    #[test]
    fn test_search_and_facilities_are_ored_groups() {
        let filter = HostelFilter {
            search: Some("  Thamel ".into()),
            facilities: vec!["WiFi".into(), "Locker".into()],
            min_price: Some(500.0),
            max_price: Some(1500.0),
            ..Default::default()
        };
        let sql = sql_for(&filter, "price".parse().unwrap());
        assert!(sql.contains("'%thamel%'"));
        assert!(sql.contains(r#""facility_tags" LIKE '%wifi%'"#));
        assert!(sql.contains(r#""facility_tags" LIKE '%locker%'"#));
        assert!(!sql.contains(r#"LOWER("facilities")"#));
        assert!(sql.contains(r#""price_per_night" >= 500"#));
        assert!(sql.contains(r#""price_per_night" <= 1500"#));
        assert!(sql.contains(r#"ORDER BY "hostels"."price_per_night" ASC"#));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = HostelFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert!(!sql_for(&filter, HostelSort::default()).contains("LIKE"));
    }
}
