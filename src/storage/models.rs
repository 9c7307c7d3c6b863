use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::services::types::TS_EXPORT_PATH;

/// 连续失败次数达到该值后锁定账户
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;
/// 锁定时长（分钟）
pub const LOCK_DURATION_MINUTES: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub google_maps_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Hostel {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub short_description: Option<String>,
    pub images: Vec<String>,
    pub price_per_night: f64,
    pub total_beds: i32,
    pub contact_info: ContactInfo,
    pub location: Location,
    pub facilities: Vec<String>,
    pub featured: bool,
    #[ts(type = "number")]
    pub clicks: u64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hostel {
    /// 列表/榜单用精简视图
    pub fn summary(&self) -> HostelSummary {
        HostelSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            clicks: self.clicks,
            featured: self.featured,
            price_per_night: self.price_per_night,
            location: self.location.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HostelSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[ts(type = "number")]
    pub clicks: u64,
    pub featured: bool,
    pub price_per_night: f64,
    pub location: Location,
    pub created_at: DateTime<Utc>,
}

/// 新建酒店所需的全部字段（已校验、已规整）
#[derive(Debug, Clone, Default)]
pub struct NewHostel {
    pub name: String,
    pub description: String,
    pub short_description: Option<String>,
    pub images: Vec<String>,
    pub price_per_night: f64,
    pub total_beds: i32,
    pub contact_info: ContactInfo,
    pub location: Location,
    pub facilities: Vec<String>,
    pub featured: bool,
    pub is_active: bool,
}

/// 部分更新；`None` 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct HostelChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub images: Option<Vec<String>>,
    pub price_per_night: Option<f64>,
    pub total_beds: Option<i32>,
    pub contact_info: Option<ContactInfo>,
    pub location: Option<Location>,
    pub facilities: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl HostelChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.short_description.is_none()
            && self.images.is_none()
            && self.price_per_night.is_none()
            && self.total_beds.is_none()
            && self.contact_info.is_none()
            && self.location.is_none()
            && self.facilities.is_none()
            && self.featured.is_none()
            && self.is_active.is_none()
    }
}

/// 管理员账户
///
/// `password_hash` 永不序列化
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub login_attempts: u32,
    pub lock_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 一次失败登录应执行的更新
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedLoginUpdate {
    /// 旧锁已过期：计数重置为 1 并清除锁
    Restart,
    /// 计数 +1；达到上限且当前未锁定时加锁
    Increment,
}

impl Admin {
    pub const ROLE_ADMIN: &'static str = "admin";

    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.is_some_and(|until| until > now)
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked_at(Utc::now())
    }

    pub fn failed_login_update(&self, now: DateTime<Utc>) -> FailedLoginUpdate {
        match self.lock_until {
            Some(until) if until < now => FailedLoginUpdate::Restart,
            _ => FailedLoginUpdate::Increment,
        }
    }

    /// 失败登录后的 (login_attempts, lock_until)
    pub fn after_failed_login(&self, now: DateTime<Utc>) -> (u32, Option<DateTime<Utc>>) {
        match self.failed_login_update(now) {
            FailedLoginUpdate::Restart => (1, None),
            FailedLoginUpdate::Increment => {
                let attempts = self.login_attempts.saturating_add(1);
                let lock_until = if attempts >= MAX_LOGIN_ATTEMPTS && !self.is_locked_at(now) {
                    Some(now + Duration::minutes(LOCK_DURATION_MINUTES))
                } else {
                    self.lock_until
                };
                (attempts, lock_until)
            }
        }
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            last_login: self.last_login,
            created_at: Some(self.created_at),
        }
    }
}

/// 对外暴露的管理员信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    pub role: String,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminProfile {
    pub fn without_created_at(mut self) -> Self {
        self.created_at = None;
        self
    }
}

/// 分页信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Pagination {
    #[ts(type = "number")]
    pub page: u64,
    #[ts(type = "number")]
    pub limit: u64,
    #[ts(type = "number")]
    pub total: u64,
    #[ts(type = "number")]
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }

    /// 行偏移量，溢出时返回 None
    pub fn offset(page: u64, limit: u64) -> Option<u64> {
        page.saturating_sub(1).checked_mul(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(attempts: u32, lock_until: Option<DateTime<Utc>>) -> Admin {
        let now = Utc::now();
        Admin {
            id: "a".into(),
            email: "admin@example.com".into(),
            password_hash: String::new(),
            role: Admin::ROLE_ADMIN.into(),
            is_active: true,
            last_login: None,
            login_attempts: attempts,
            lock_until,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 12, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(!p.has_prev_page);

        let p = Pagination::new(3, 12, 25);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);

        let empty = Pagination::new(1, 12, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);

        let beyond = Pagination::new(9, 12, 25);
        assert!(!beyond.has_next_page);

        assert_eq!(Pagination::offset(3, 12), Some(24));
        assert_eq!(Pagination::offset(0, 12), Some(0));
        assert_eq!(Pagination::offset(u64::MAX, 50), None);

        let huge = Pagination::new(i64::MAX as u64, 50, 3);
        assert_eq!(huge.total_pages, 1);
        assert!(!huge.has_next_page);
    }

    #[test]
    fn test_lock_is_set_on_fifth_failure() {
        let now = Utc::now();
        let (attempts, lock) = admin(3, None).after_failed_login(now);
        assert_eq!(attempts, 4);
        assert!(lock.is_none());

        let (attempts, lock) = admin(4, None).after_failed_login(now);
        assert_eq!(attempts, 5);
        assert_eq!(lock, Some(now + Duration::minutes(LOCK_DURATION_MINUTES)));
    }

    #[test]
    fn test_existing_lock_is_not_extended() {
        let now = Utc::now();
        let until = now + Duration::minutes(10);
        let (attempts, lock) = admin(5, Some(until)).after_failed_login(now);
        assert_eq!(attempts, 6);
        assert_eq!(lock, Some(until));
    }

    #[test]
    fn test_expired_lock_restarts_at_one() {
        let now = Utc::now();
        let locked = admin(5, Some(now - Duration::minutes(1)));
        assert!(!locked.is_locked_at(now));
        assert_eq!(locked.failed_login_update(now), FailedLoginUpdate::Restart);
        assert_eq!(locked.after_failed_login(now), (1, None));
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let mut a = admin(0, None);
        a.password_hash = "$argon2id$secret".into();
        let json = serde_json::to_string(&a).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
    }
}
