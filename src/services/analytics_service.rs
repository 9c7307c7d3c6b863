//! Analytics service
//!
//! Dashboard metrics, click analytics and system info. Aggregation runs in
//! memory over the hostels loaded by the storage layer.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::api::services::types::TS_EXPORT_PATH;
use crate::errors::Result;
use crate::services::hostel_service::parse_int_param;
use crate::storage::{Hostel, HostelSort, HostelSummary, SeaOrmStorage, SortField};
use crate::utils::validation::{FieldErrors, non_blank};

/// 价格分布区间下界，最后一个区间无上界
pub const PRICE_BOUNDARIES: [f64; 6] = [0.0, 5000.0, 10000.0, 15000.0, 20000.0, 30000.0];

const STATS_TOP_LIMIT: usize = 5;
const DASHBOARD_LIST_LIMIT: usize = 10;
const TOP_FACILITIES_LIMIT: usize = 15;
const TREND_MONTHS: u32 = 12;
const DEFAULT_ANALYTICS_LIMIT: u64 = 10;
const MAX_ANALYTICS_LIMIT: u64 = 100;

// ============ Request/Response DTOs ============

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TopHostel {
    pub id: String,
    pub name: String,
    #[ts(type = "number")]
    pub clicks: u64,
}

impl From<&Hostel> for TopHostel {
    fn from(h: &Hostel) -> Self {
        Self {
            id: h.id.clone(),
            name: h.name.clone(),
            clicks: h.clicks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HostelCounts {
    #[ts(type = "number")]
    pub total_hostels: u64,
    #[ts(type = "number")]
    pub active_hostels: u64,
    #[ts(type = "number")]
    pub featured_hostels: u64,
    #[ts(type = "number")]
    pub recent_hostels: u64,
    #[ts(type = "number")]
    pub total_clicks: u64,
    #[ts(type = "number")]
    pub inactive_hostels: u64,
}

/// `GET /api/hostels/admin/stats`
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HostelStats {
    pub stats: HostelCounts,
    pub top_hostels: Vec<TopHostel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Overview {
    #[ts(type = "number")]
    pub total_hostels: u64,
    #[ts(type = "number")]
    pub active_hostels: u64,
    #[ts(type = "number")]
    pub inactive_hostels: u64,
    #[ts(type = "number")]
    pub featured_hostels: u64,
    #[ts(type = "number")]
    pub total_clicks: u64,
    #[ts(type = "number")]
    pub avg_clicks_per_hostel: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Growth {
    #[ts(type = "number")]
    pub new_hostels_today: u64,
    #[ts(type = "number")]
    pub new_hostels_this_week: u64,
    #[ts(type = "number")]
    pub new_hostels_this_month: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PriceBucket {
    pub min: f64,
    /// `null` 表示无上界
    pub max: Option<f64>,
    #[ts(type = "number")]
    pub count: u64,
    pub avg_clicks: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Pricing {
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_distribution: Vec<PriceBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FacilityCount {
    pub name: String,
    #[ts(type = "number")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    #[ts(type = "number")]
    pub count: u64,
    #[ts(type = "number")]
    pub total_clicks: u64,
}

/// `GET /api/admin/metrics`
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DashboardMetrics {
    pub overview: Overview,
    pub growth: Growth,
    pub pricing: Pricing,
    pub popular_hostels: Vec<HostelSummary>,
    pub recent_hostels: Vec<HostelSummary>,
    pub top_facilities: Vec<FacilityCount>,
    pub monthly_trend: Vec<MonthlyTrend>,
}

/// 点击统计的时间范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsPeriod {
    Day,
    Week,
    Month,
    All,
}

impl AnalyticsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsPeriod::Day => "1d",
            AnalyticsPeriod::Week => "7d",
            AnalyticsPeriod::Month => "30d",
            AnalyticsPeriod::All => "all",
        }
    }

    /// created_at 下界，`All` 无下界
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            AnalyticsPeriod::Day => Some(now - Duration::days(1)),
            AnalyticsPeriod::Week => Some(now - Duration::days(7)),
            AnalyticsPeriod::Month => Some(now - Duration::days(30)),
            AnalyticsPeriod::All => None,
        }
    }
}

impl std::str::FromStr for AnalyticsPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1d" => Ok(AnalyticsPeriod::Day),
            "7d" => Ok(AnalyticsPeriod::Week),
            "30d" => Ok(AnalyticsPeriod::Month),
            "all" => Ok(AnalyticsPeriod::All),
            _ => Err("period must be one of [1d, 7d, 30d, all]".to_string()),
        }
    }
}

/// `GET /api/track/analytics` query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickAnalyticsQuery {
    pub period: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ClickAnalyticsRequest {
    pub period: AnalyticsPeriod,
    pub limit: u64,
    pub sort: HostelSort,
}

impl ClickAnalyticsQuery {
    pub fn into_request(self) -> Result<ClickAnalyticsRequest> {
        let mut errors = FieldErrors::new();

        let period = match non_blank(self.period.as_deref()) {
            Some(raw) => raw.parse::<AnalyticsPeriod>().unwrap_or_else(|msg| {
                errors.push("period", msg);
                AnalyticsPeriod::Week
            }),
            None => AnalyticsPeriod::Week,
        };

        let limit = parse_int_param(
            &mut errors,
            "limit",
            self.limit.as_deref(),
            DEFAULT_ANALYTICS_LIMIT,
            1,
            Some(MAX_ANALYTICS_LIMIT),
        );

        let sort = match non_blank(self.sort_by.as_deref()) {
            Some(raw) => raw.parse::<HostelSort>().unwrap_or_else(|msg| {
                errors.push("sortBy", msg);
                HostelSort::default()
            }),
            None => HostelSort::default(),
        };

        errors.into_query_result()?;
        Ok(ClickAnalyticsRequest {
            period,
            limit,
            sort,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ClickSummary {
    pub period: String,
    #[ts(type = "number")]
    pub total_clicks: u64,
    #[ts(type = "number")]
    pub total_hostels: u64,
    #[ts(type = "number")]
    pub avg_clicks: u64,
    pub top_hostel: Option<TopHostel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ClickAnalytics {
    pub analytics: ClickSummary,
    pub hostels: Vec<HostelSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DatabaseInfo {
    pub status: String,
    pub backend: String,
}

/// `GET /api/admin/system-info`
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SystemInfo {
    pub version: String,
    pub environment: String,
    #[ts(type = "number")]
    pub uptime: u64,
    pub database: DatabaseInfo,
    #[ts(type = "number")]
    pub admin_count: u64,
    pub server_time: DateTime<Utc>,
}

// ============ Aggregation ============

/// 四舍五入的整数平均值
fn rounded_avg(sum: u64, count: u64) -> u64 {
    if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as u64
    }
}

/// 与列表查询一致的排序：主键字段，然后 createdAt DESC，最后 id
pub fn sort_hostels(hostels: &mut [Hostel], sort: HostelSort) {
    hostels.sort_by(|a, b| {
        let primary = match sort.field {
            SortField::Clicks => a.clicks.cmp(&b.clicks),
            SortField::Price => a
                .price_per_night
                .partial_cmp(&b.price_per_night)
                .unwrap_or(Ordering::Equal),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let primary = if sort.descending {
            primary.reverse()
        } else {
            primary
        };
        primary
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn top_by_clicks<'a>(hostels: impl Iterator<Item = &'a Hostel>, limit: usize) -> Vec<&'a Hostel> {
    let mut list: Vec<&Hostel> = hostels.collect();
    list.sort_by(|a, b| {
        b.clicks
            .cmp(&a.clicks)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    list.truncate(limit);
    list
}

pub fn compute_hostel_stats(hostels: &[Hostel], now: DateTime<Utc>) -> HostelStats {
    let week_ago = now - Duration::days(7);
    let total_hostels = hostels.len() as u64;
    let active_hostels = hostels.iter().filter(|h| h.is_active).count() as u64;

    HostelStats {
        stats: HostelCounts {
            total_hostels,
            active_hostels,
            featured_hostels: hostels.iter().filter(|h| h.is_active && h.featured).count() as u64,
            recent_hostels: hostels.iter().filter(|h| h.created_at >= week_ago).count() as u64,
            total_clicks: hostels.iter().map(|h| h.clicks).sum(),
            inactive_hostels: total_hostels - active_hostels,
        },
        top_hostels: top_by_clicks(hostels.iter().filter(|h| h.is_active), STATS_TOP_LIMIT)
            .into_iter()
            .map(TopHostel::from)
            .collect(),
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(chrono::NaiveTime::MIN))
}

/// 当月第一天往前推 `months_back` 个月
fn start_of_month(now: DateTime<Utc>, months_back: u32) -> DateTime<Utc> {
    let total = now.year() * 12 + now.month0() as i32 - months_back as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12) as u32);
    let date = NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(now.date_naive());
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

fn bucket_index(price: f64) -> usize {
    PRICE_BOUNDARIES
        .iter()
        .rposition(|lower| price >= *lower)
        .unwrap_or(0)
}

fn price_distribution(active: &[&Hostel]) -> Vec<PriceBucket> {
    let mut buckets: Vec<(u64, u64)> = vec![(0, 0); PRICE_BOUNDARIES.len()];
    for h in active {
        let entry = &mut buckets[bucket_index(h.price_per_night)];
        entry.0 += 1;
        entry.1 += h.clicks;
    }

    // 只返回有数据的区间
    buckets
        .into_iter()
        .enumerate()
        .filter(|(_, (count, _))| *count > 0)
        .map(|(i, (count, clicks))| PriceBucket {
            min: PRICE_BOUNDARIES[i],
            max: PRICE_BOUNDARIES.get(i + 1).copied(),
            count,
            avg_clicks: clicks as f64 / count as f64,
        })
        .collect()
}

fn top_facilities(active: &[&Hostel]) -> Vec<FacilityCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for h in active {
        for facility in &h.facilities {
            *counts.entry(facility.as_str()).or_default() += 1;
        }
    }
    let mut list: Vec<FacilityCount> = counts
        .into_iter()
        .map(|(name, count)| FacilityCount {
            name: name.to_string(),
            count,
        })
        .collect();
    list.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    list.truncate(TOP_FACILITIES_LIMIT);
    list
}

fn monthly_trend(hostels: &[Hostel], now: DateTime<Utc>) -> Vec<MonthlyTrend> {
    let since = start_of_month(now, TREND_MONTHS - 1);
    let mut months: BTreeMap<(i32, u32), (u64, u64)> = BTreeMap::new();
    for h in hostels.iter().filter(|h| h.created_at >= since) {
        let entry = months
            .entry((h.created_at.year(), h.created_at.month()))
            .or_default();
        entry.0 += 1;
        entry.1 += h.clicks;
    }
    months
        .into_iter()
        .map(|((year, month), (count, total_clicks))| MonthlyTrend {
            year,
            month,
            count,
            total_clicks,
        })
        .collect()
}

pub fn compute_dashboard_metrics(hostels: &[Hostel], now: DateTime<Utc>) -> DashboardMetrics {
    let active: Vec<&Hostel> = hostels.iter().filter(|h| h.is_active).collect();
    let total_hostels = hostels.len() as u64;
    let active_hostels = active.len() as u64;
    let total_clicks: u64 = hostels.iter().map(|h| h.clicks).sum();

    let today = start_of_day(now);
    let week_ago = now - Duration::days(7);
    let month_start = start_of_month(now, 0);
    let created_since = |since: DateTime<Utc>| {
        hostels.iter().filter(|h| h.created_at >= since).count() as u64
    };

    let pricing = if active.is_empty() {
        Pricing {
            avg_price: 0.0,
            min_price: 0.0,
            max_price: 0.0,
            price_distribution: Vec::new(),
        }
    } else {
        let prices = active.iter().map(|h| h.price_per_night);
        let sum: f64 = prices.clone().sum();
        Pricing {
            avg_price: (sum / active.len() as f64).round(),
            min_price: prices.clone().fold(f64::INFINITY, f64::min),
            max_price: prices.fold(f64::NEG_INFINITY, f64::max),
            price_distribution: price_distribution(&active),
        }
    };

    let mut recent = active.clone();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    recent.truncate(DASHBOARD_LIST_LIMIT);

    DashboardMetrics {
        overview: Overview {
            total_hostels,
            active_hostels,
            inactive_hostels: total_hostels - active_hostels,
            featured_hostels: active.iter().filter(|h| h.featured).count() as u64,
            total_clicks,
            avg_clicks_per_hostel: rounded_avg(total_clicks, active_hostels),
        },
        growth: Growth {
            new_hostels_today: created_since(today),
            new_hostels_this_week: created_since(week_ago),
            new_hostels_this_month: created_since(month_start),
        },
        pricing,
        popular_hostels: top_by_clicks(active.iter().copied(), DASHBOARD_LIST_LIMIT)
            .into_iter()
            .map(Hostel::summary)
            .collect(),
        recent_hostels: recent.into_iter().map(Hostel::summary).collect(),
        top_facilities: top_facilities(&active),
        monthly_trend: monthly_trend(hostels, now),
    }
}

/// `hostels` 应已按 period 过滤且只含上架酒店
pub fn compute_click_analytics(
    mut hostels: Vec<Hostel>,
    request: &ClickAnalyticsRequest,
) -> ClickAnalytics {
    let total_hostels = hostels.len() as u64;
    let total_clicks: u64 = hostels.iter().map(|h| h.clicks).sum();
    let top_hostel = top_by_clicks(hostels.iter(), 1)
        .first()
        .map(|h| TopHostel::from(*h));

    sort_hostels(&mut hostels, request.sort);
    hostels.truncate(request.limit as usize);

    ClickAnalytics {
        analytics: ClickSummary {
            period: request.period.as_str().to_string(),
            total_clicks,
            total_hostels,
            avg_clicks: rounded_avg(total_clicks, total_hostels),
            top_hostel,
        },
        hostels: hostels.iter().map(Hostel::summary).collect(),
    }
}

// ============ AnalyticsService Implementation ============

/// Service for dashboard and click analytics
pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics> {
        let hostels = self.storage.load_hostels_for_analytics(false, None).await?;
        debug!(
            "AnalyticsService: computing dashboard over {} hostels",
            hostels.len()
        );
        Ok(compute_dashboard_metrics(&hostels, Utc::now()))
    }

    pub async fn click_analytics(&self, query: ClickAnalyticsQuery) -> Result<ClickAnalytics> {
        let request = query.into_request()?;
        let since = request.period.since(Utc::now());
        let hostels = self.storage.load_hostels_for_analytics(true, since).await?;
        Ok(compute_click_analytics(hostels, &request))
    }

    pub async fn system_info(&self, started_at: DateTime<Utc>) -> Result<SystemInfo> {
        let config = crate::config::get_config();
        let now = Utc::now();
        let connected = self.storage.ping().await;
        let admin_count = self.storage.count_active_admins().await?;

        Ok(SystemInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.server.environment.clone(),
            uptime: (now - started_at).num_seconds().max(0) as u64,
            database: DatabaseInfo {
                status: if connected { "connected" } else { "disconnected" }.to_string(),
                backend: self.storage.backend_name().to_string(),
            },
            admin_count,
            server_time: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ContactInfo, Location};

    fn hostel(id: &str, price: f64, clicks: u64, created_at: DateTime<Utc>) -> Hostel {
        Hostel {
            id: id.to_string(),
            name: format!("Hostel {}", id),
            slug: format!("hostel-{}", id),
            description: "desc".into(),
            short_description: None,
            images: Vec::new(),
            price_per_night: price,
            total_beds: 10,
            contact_info: ContactInfo::default(),
            location: Location::default(),
            facilities: vec!["WiFi".into()],
            featured: false,
            clicks,
            is_active: true,
            created_at,
            updated_at: created_at,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_hostel_stats() {
        let now = now();
        let mut inactive = hostel("c", 100.0, 50, now - Duration::days(30));
        inactive.is_active = false;
        let mut featured = hostel("b", 100.0, 7, now - Duration::days(2));
        featured.featured = true;
        let hostels = vec![hostel("a", 100.0, 3, now - Duration::days(1)), featured, inactive];

        let stats = compute_hostel_stats(&hostels, now);
        assert_eq!(stats.stats.total_hostels, 3);
        assert_eq!(stats.stats.active_hostels, 2);
        assert_eq!(stats.stats.inactive_hostels, 1);
        assert_eq!(stats.stats.featured_hostels, 1);
        assert_eq!(stats.stats.recent_hostels, 2);
        assert_eq!(stats.stats.total_clicks, 60);
        // 下架的不进榜单
        assert_eq!(stats.top_hostels[0].id, "b");
        assert_eq!(stats.top_hostels.len(), 2);
    }

    #[test]
    fn test_price_buckets() {
        assert_eq!(bucket_index(0.0), 0);
        assert_eq!(bucket_index(4999.0), 0);
        assert_eq!(bucket_index(5000.0), 1);
        assert_eq!(bucket_index(29999.0), 4);
        assert_eq!(bucket_index(1_000_000.0), 5);
    }

    #[test]
    fn test_dashboard_metrics() {
        let now = now();
        let hostels = vec![
            hostel("a", 800.0, 10, now - Duration::hours(1)),
            hostel("b", 6000.0, 5, now - Duration::days(5)),
            hostel("c", 40000.0, 0, now - Duration::days(200)),
        ];
        let m = compute_dashboard_metrics(&hostels, now);

        assert_eq!(m.overview.avg_clicks_per_hostel, 5);
        assert_eq!(m.growth.new_hostels_today, 1);
        assert_eq!(m.growth.new_hostels_this_week, 2);
        assert_eq!(m.growth.new_hostels_this_month, 2);
        assert_eq!(m.pricing.min_price, 800.0);
        assert_eq!(m.pricing.max_price, 40000.0);
        assert_eq!(m.pricing.avg_price, 15600.0);
        assert_eq!(m.pricing.price_distribution.len(), 3);
        assert_eq!(m.pricing.price_distribution[2].max, None);
        assert_eq!(m.popular_hostels[0].id, "a");
        assert_eq!(m.recent_hostels[0].id, "a");
        assert_eq!(m.top_facilities[0].count, 3);
        // 200 天前仍在 12 个月窗口内
        assert_eq!(m.monthly_trend.len(), 2);
        assert_eq!((m.monthly_trend[1].year, m.monthly_trend[1].month), (2026, 3));
        assert_eq!(m.monthly_trend[1].count, 2);
        assert!(m.monthly_trend.windows(2).all(|w| (w[0].year, w[0].month) < (w[1].year, w[1].month)));
    }

    #[test]
    fn test_start_of_month_crosses_year() {
        let since = start_of_month(now(), 11);
        assert_eq!(since, Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_click_analytics() {
        let now = now();
        let hostels = vec![
            hostel("a", 100.0, 1, now),
            hostel("b", 100.0, 9, now),
            hostel("c", 100.0, 4, now),
        ];
        let request = ClickAnalyticsRequest {
            period: AnalyticsPeriod::All,
            limit: 2,
            sort: HostelSort::default(),
        };
        let result = compute_click_analytics(hostels, &request);
        assert_eq!(result.analytics.total_clicks, 14);
        assert_eq!(result.analytics.total_hostels, 3);
        assert_eq!(result.analytics.avg_clicks, 5);
        assert_eq!(result.analytics.top_hostel.as_ref().map(|t| t.id.as_str()), Some("b"));
        let ids: Vec<&str> = result.hostels.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_click_analytics_empty() {
        let request = ClickAnalyticsQuery::default().into_request().unwrap();
        assert_eq!(request.period, AnalyticsPeriod::Week);
        let result = compute_click_analytics(Vec::new(), &request);
        assert_eq!(result.analytics.avg_clicks, 0);
        assert!(result.analytics.top_hostel.is_none());
    }

    #[test]
    fn test_analytics_query_rejects_unknown_period() {
        let query = ClickAnalyticsQuery {
            period: Some("90d".into()),
            ..Default::default()
        };
        assert!(query.into_request().is_err());
    }
}
