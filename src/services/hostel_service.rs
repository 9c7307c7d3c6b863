//! Hostel catalogue service
//!
//! Turns raw request bodies and query strings into validated storage calls.
//! Validation collects every field error before rejecting a request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::api::services::types::TS_EXPORT_PATH;
use crate::errors::{NepstayError, Result};
use crate::services::analytics_service::{HostelStats, compute_hostel_stats};
use crate::storage::{
    ContactInfo, Hostel, HostelChanges, HostelFilter, HostelSort, Location, NewHostel, Pagination,
    SeaOrmStorage,
};
use crate::utils::url_validator::{
    is_google_maps_embed, validate_profile_url, validate_url, validate_website_url,
};
use crate::utils::validation::{
    FieldErrors, char_len, is_valid_email, is_valid_id, is_valid_whatsapp, non_blank,
};

pub const DEFAULT_PAGE_LIMIT: u64 = 12;
pub const MAX_PAGE_LIMIT: u64 = 50;
pub const DEFAULT_SHOWCASE_LIMIT: u64 = 6;
pub const MAX_SEARCH_LEN: usize = 100;

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_SHORT_DESCRIPTION_LEN: usize = 200;
const MAX_ADDRESS_LEN: usize = 200;
const MAX_IMAGES: usize = 10;
const MAX_FACILITIES: usize = 20;
const MAX_FACILITY_LEN: usize = 50;

// ============ Request/Response DTOs ============

/// Hostel create/update body
///
/// Legacy names `price`, `contact` and a top-level `address` are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub images: Option<Vec<String>>,
    #[serde(alias = "price")]
    pub price_per_night: Option<f64>,
    pub total_beds: Option<i64>,
    #[serde(alias = "contact")]
    pub contact_info: Option<ContactInfo>,
    pub location: Option<Location>,
    pub address: Option<String>,
    pub facilities: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl HostelPayload {
    fn has_any_field(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.short_description.is_some()
            || self.images.is_some()
            || self.price_per_night.is_some()
            || self.total_beds.is_some()
            || self.contact_info.is_some()
            || self.location.is_some()
            || self.address.is_some()
            || self.facilities.is_some()
            || self.featured.is_some()
            || self.is_active.is_some()
    }
}

/// `GET /api/hostels` query string, kept as raw strings so type errors
/// become field-level QUERY_VALIDATION_ERROR details
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelListQuery {
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub facilities: Option<String>,
    pub featured: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// `?limit=` for featured/popular
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowcaseQuery {
    pub limit: Option<String>,
}

/// Validated list request
#[derive(Debug, Clone)]
pub struct HostelSearch {
    pub filter: HostelFilter,
    pub sort: HostelSort,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Clone)]
pub struct HostelPage {
    pub hostels: Vec<Hostel>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FeaturedToggle {
    pub id: String,
    pub name: String,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ClickResult {
    pub id: String,
    pub name: String,
    #[ts(type = "number")]
    pub clicks: u64,
}

// ============ Query parsing ============

pub(crate) fn parse_bool_param(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_price_param(errors: &mut FieldErrors, field: &str, raw: Option<&str>) -> Option<f64> {
    let raw = non_blank(raw)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        Ok(v) if v.is_finite() => {
            errors.push(field, format!("{} must be greater than or equal to 0", field));
            None
        }
        _ => {
            errors.push(field, format!("{} must be a number", field));
            None
        }
    }
}

/// 整数参数，超出 [min, max] 记录错误并回退默认值
pub(crate) fn parse_int_param(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
    default: u64,
    min: u64,
    max: Option<u64>,
) -> u64 {
    let Some(raw) = non_blank(raw) else {
        return default;
    };
    let Ok(value) = raw.parse::<i64>() else {
        errors.push(field, format!("{} must be an integer", field));
        return default;
    };
    if value < min as i64 {
        errors.push(field, format!("{} must be greater than or equal to {}", field, min));
        return default;
    }
    let value = value as u64;
    if let Some(max) = max
        && value > max
    {
        errors.push(field, format!("{} must be less than or equal to {}", field, max));
        return default;
    }
    value
}

impl HostelListQuery {
    pub fn into_search(self) -> Result<HostelSearch> {
        let mut errors = FieldErrors::new();

        let search = self.search.as_deref().map(str::trim).unwrap_or_default();
        if char_len(search) > MAX_SEARCH_LEN {
            errors.push(
                "search",
                format!(
                    "search length must be less than or equal to {} characters long",
                    MAX_SEARCH_LEN
                ),
            );
        }

        let min_price = parse_price_param(&mut errors, "minPrice", self.min_price.as_deref());
        let max_price = parse_price_param(&mut errors, "maxPrice", self.max_price.as_deref());

        let facilities: Vec<String> = self
            .facilities
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        let featured = match non_blank(self.featured.as_deref()) {
            Some(raw) => {
                let parsed = parse_bool_param(raw);
                if parsed.is_none() {
                    errors.push("featured", "featured must be a boolean");
                }
                parsed
            }
            None => None,
        };

        let sort = match non_blank(self.sort_by.as_deref()) {
            Some(raw) => raw.parse::<HostelSort>().unwrap_or_else(|msg| {
                errors.push("sortBy", msg);
                HostelSort::default()
            }),
            None => HostelSort::default(),
        };

        let page = parse_int_param(&mut errors, "page", self.page.as_deref(), 1, 1, None);
        let limit = parse_int_param(
            &mut errors,
            "limit",
            self.limit.as_deref(),
            DEFAULT_PAGE_LIMIT,
            1,
            Some(MAX_PAGE_LIMIT),
        );

        errors.into_query_result()?;

        Ok(HostelSearch {
            filter: HostelFilter {
                search: (!search.is_empty()).then(|| search.to_string()),
                min_price,
                max_price,
                facilities,
                featured,
                created_after: None,
            },
            sort,
            page,
            limit,
        })
    }
}

impl ShowcaseQuery {
    pub fn limit(&self) -> Result<u64> {
        let mut errors = FieldErrors::new();
        let limit = parse_int_param(
            &mut errors,
            "limit",
            self.limit.as_deref(),
            DEFAULT_SHOWCASE_LIMIT,
            1,
            Some(MAX_PAGE_LIMIT),
        );
        errors.into_query_result()?;
        Ok(limit)
    }
}

// ============ Body validation ============

/// 可选字符串：去空白，空串视为未提供
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_contact(contact: ContactInfo) -> ContactInfo {
    ContactInfo {
        phone: clean(contact.phone),
        email: clean(contact.email).map(|e| e.to_lowercase()),
        whatsapp: clean(contact.whatsapp),
        facebook: clean(contact.facebook),
        instagram: clean(contact.instagram),
        website: clean(contact.website),
    }
}

fn normalize_location(location: Location) -> Location {
    Location {
        city: clean(location.city),
        area: clean(location.area),
        address: clean(location.address),
        google_maps_url: clean(location.google_maps_url),
    }
}

fn normalize_facilities(facilities: Vec<String>) -> Vec<String> {
    facilities
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

fn validate_name(errors: &mut FieldErrors, name: &str) {
    errors.check(!name.is_empty(), "name", "Hostel name is required");
    errors.check(
        char_len(name) <= MAX_NAME_LEN,
        "name",
        "Hostel name cannot exceed 100 characters",
    );
}

fn validate_description(errors: &mut FieldErrors, description: &str) {
    errors.check(
        !description.trim().is_empty(),
        "description",
        "Description is required",
    );
    errors.check(
        char_len(description) <= MAX_DESCRIPTION_LEN,
        "description",
        "Description cannot exceed 2000 characters",
    );
}

fn validate_short_description(errors: &mut FieldErrors, short: &str) {
    errors.check(
        char_len(short) <= MAX_SHORT_DESCRIPTION_LEN,
        "shortDescription",
        "Short description cannot exceed 200 characters",
    );
}

fn validate_images(errors: &mut FieldErrors, images: &[String]) {
    errors.check(
        images.len() <= MAX_IMAGES,
        "images",
        "Maximum 10 images allowed",
    );
    for (i, image) in images.iter().enumerate() {
        if validate_url(image).is_err() {
            errors.push(format!("images.{}", i), "Please provide a valid image URL");
        }
    }
}

fn validate_price(errors: &mut FieldErrors, price: f64) {
    errors.check(price.is_finite(), "pricePerNight", "Price must be a number");
    errors.check(price >= 0.0, "pricePerNight", "Price cannot be negative");
}

fn validate_beds(errors: &mut FieldErrors, beds: i64) {
    errors.check(beds >= 1, "totalBeds", "At least 1 bed is required");
    errors.check(
        beds <= i32::MAX as i64,
        "totalBeds",
        "Total beds is out of range",
    );
}

fn validate_contact(errors: &mut FieldErrors, contact: &ContactInfo) {
    if let Some(email) = &contact.email {
        errors.check(
            is_valid_email(email),
            "contactInfo.email",
            "Please provide a valid email address",
        );
    }
    if let Some(whatsapp) = &contact.whatsapp {
        errors.check(
            is_valid_whatsapp(whatsapp),
            "contactInfo.whatsapp",
            "Please provide a valid WhatsApp number",
        );
    }
    if let Some(facebook) = &contact.facebook {
        errors.check(
            validate_profile_url(facebook, "facebook.com").is_ok(),
            "contactInfo.facebook",
            "Please provide a valid Facebook URL",
        );
    }
    if let Some(instagram) = &contact.instagram {
        errors.check(
            validate_profile_url(instagram, "instagram.com").is_ok(),
            "contactInfo.instagram",
            "Please provide a valid Instagram URL",
        );
    }
    if let Some(website) = &contact.website {
        errors.check(
            validate_website_url(website).is_ok(),
            "contactInfo.website",
            "Please provide a valid website URL",
        );
    }
}

fn validate_location(errors: &mut FieldErrors, location: &Location) {
    if let Some(address) = &location.address {
        errors.check(
            char_len(address) <= MAX_ADDRESS_LEN,
            "location.address",
            "Address cannot exceed 200 characters",
        );
    }
    if let Some(url) = &location.google_maps_url {
        errors.check(
            is_google_maps_embed(url),
            "location.googleMapsUrl",
            "Please provide a valid Google Maps embed URL",
        );
    }
}

fn validate_facilities(errors: &mut FieldErrors, facilities: &[String]) {
    errors.check(
        facilities.len() <= MAX_FACILITIES,
        "facilities",
        "Maximum 20 facilities allowed",
    );
    for (i, facility) in facilities.iter().enumerate() {
        if char_len(facility) > MAX_FACILITY_LEN {
            errors.push(
                format!("facilities.{}", i),
                "Facility name cannot exceed 50 characters",
            );
        }
    }
}

/// 合并 `location` 与旧版顶层 `address`
fn merge_location(location: Option<Location>, legacy_address: Option<String>) -> Option<Location> {
    match (location, clean(legacy_address)) {
        (Some(mut loc), Some(address)) => {
            if loc.address.as_deref().is_none_or(|a| a.trim().is_empty()) {
                loc.address = Some(address);
            }
            Some(loc)
        }
        (Some(loc), None) => Some(loc),
        (None, Some(address)) => Some(Location {
            address: Some(address),
            ..Default::default()
        }),
        (None, None) => None,
    }
}

impl HostelPayload {
    /// 校验并转换为新建记录
    pub fn into_new_hostel(self) -> Result<NewHostel> {
        let mut errors = FieldErrors::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default().to_string();
        validate_name(&mut errors, &name);

        let description = self.description.unwrap_or_default();
        validate_description(&mut errors, &description);

        let short_description = clean(self.short_description);
        if let Some(short) = &short_description {
            validate_short_description(&mut errors, short);
        }

        let images: Vec<String> = self
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|i| i.trim().to_string())
            .collect();
        validate_images(&mut errors, &images);

        let price_per_night = match self.price_per_night {
            Some(price) => {
                validate_price(&mut errors, price);
                price
            }
            None => {
                errors.push("pricePerNight", "Price is required");
                0.0
            }
        };

        let total_beds = match self.total_beds {
            Some(beds) => {
                validate_beds(&mut errors, beds);
                beds
            }
            None => {
                errors.push("totalBeds", "Total beds is required");
                0
            }
        };

        let contact_info = normalize_contact(self.contact_info.unwrap_or_default());
        validate_contact(&mut errors, &contact_info);

        let location = normalize_location(
            merge_location(self.location, self.address).unwrap_or_default(),
        );
        validate_location(&mut errors, &location);

        let facilities = normalize_facilities(self.facilities.unwrap_or_default());
        validate_facilities(&mut errors, &facilities);

        errors.into_result()?;

        Ok(NewHostel {
            name,
            description,
            short_description,
            images,
            price_per_night,
            total_beds: total_beds as i32,
            contact_info,
            location,
            facilities,
            featured: self.featured.unwrap_or(false),
            is_active: self.is_active.unwrap_or(true),
        })
    }

    /// 校验并转换为部分更新（至少一个字段）
    pub fn into_changes(self) -> Result<HostelChanges> {
        if !self.has_any_field() {
            return Err(NepstayError::invalid_field(
                "body",
                "At least one field must be provided",
            ));
        }

        let mut errors = FieldErrors::new();

        let name = self.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            validate_name(&mut errors, name);
        }

        if let Some(description) = &self.description {
            validate_description(&mut errors, description);
        }

        let short_description = self.short_description.map(|s| s.trim().to_string());
        if let Some(short) = &short_description {
            validate_short_description(&mut errors, short);
        }

        let images = self
            .images
            .map(|list| list.into_iter().map(|i| i.trim().to_string()).collect::<Vec<_>>());
        if let Some(images) = &images {
            validate_images(&mut errors, images);
        }

        if let Some(price) = self.price_per_night {
            validate_price(&mut errors, price);
        }

        if let Some(beds) = self.total_beds {
            validate_beds(&mut errors, beds);
        }

        let contact_info = self.contact_info.map(normalize_contact);
        if let Some(contact) = &contact_info {
            validate_contact(&mut errors, contact);
        }

        let location = merge_location(self.location, self.address).map(normalize_location);
        if let Some(location) = &location {
            validate_location(&mut errors, location);
        }

        let facilities = self.facilities.map(normalize_facilities);
        if let Some(facilities) = &facilities {
            validate_facilities(&mut errors, facilities);
        }

        errors.into_result()?;

        Ok(HostelChanges {
            name,
            description: self.description,
            short_description,
            images,
            price_per_night: self.price_per_night,
            total_beds: self.total_beds.map(|b| b as i32),
            contact_info,
            location,
            facilities,
            featured: self.featured,
            is_active: self.is_active,
        })
    }
}

// ============ HostelService Implementation ============

/// Service for hostel catalogue operations
pub struct HostelService {
    storage: Arc<SeaOrmStorage>,
}

impl HostelService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 搜索 / 过滤 / 分页
    pub async fn list(&self, query: HostelListQuery) -> Result<HostelPage> {
        let search = query.into_search()?;
        self.search(search).await
    }

    pub async fn search(&self, search: HostelSearch) -> Result<HostelPage> {
        let (hostels, total) = self
            .storage
            .search_hostels(&search.filter, search.sort, search.page, search.limit)
            .await?;

        Ok(HostelPage {
            hostels,
            pagination: Pagination::new(search.page, search.limit, total),
        })
    }

    /// 按 UUID 或 slug 获取
    ///
    /// slug 查询只返回已上架的；UUID 查询到下架酒店时仅管理员可见
    pub async fn get(&self, id_or_slug: &str, is_admin: bool) -> Result<Hostel> {
        let hostel = if is_valid_id(id_or_slug) {
            self.storage
                .find_hostel_by_id(id_or_slug)
                .await?
                .filter(|h| h.is_active || is_admin)
        } else {
            self.storage.find_active_hostel_by_slug(id_or_slug).await?
        };

        hostel.ok_or_else(NepstayError::hostel_not_found)
    }

    pub async fn featured(&self, limit: u64) -> Result<Vec<Hostel>> {
        self.storage.top_hostels(true, limit).await
    }

    pub async fn popular(&self, limit: u64) -> Result<Vec<Hostel>> {
        self.storage.top_hostels(false, limit).await
    }

    pub async fn create(&self, payload: HostelPayload) -> Result<Hostel> {
        let new = payload.into_new_hostel()?;
        let hostel = self.storage.create_hostel(&new).await?;
        info!("HostelService: created hostel '{}' ({})", hostel.name, hostel.id);
        Ok(hostel)
    }

    pub async fn update(&self, id: &str, payload: HostelPayload) -> Result<Hostel> {
        let changes = payload.into_changes()?;
        // 非 UUID 不可能命中
        if !is_valid_id(id) {
            return Err(NepstayError::hostel_not_found());
        }
        let hostel = self.storage.update_hostel(id, changes).await?;
        info!("HostelService: updated hostel '{}'", hostel.id);
        Ok(hostel)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !is_valid_id(id) {
            return Err(NepstayError::hostel_not_found());
        }
        self.storage.delete_hostel(id).await
    }

    pub async fn toggle_featured(&self, id: &str) -> Result<FeaturedToggle> {
        if !is_valid_id(id) {
            return Err(NepstayError::hostel_not_found());
        }
        let hostel = self.storage.toggle_featured(id).await?;
        info!(
            "HostelService: hostel '{}' featured={}",
            hostel.id, hostel.featured
        );
        Ok(FeaturedToggle {
            id: hostel.id,
            name: hostel.name,
            featured: hostel.featured,
        })
    }

    /// 点击计数 +1
    pub async fn track_click(&self, hostel_id: Option<&str>) -> Result<ClickResult> {
        let hostel_id = match non_blank(hostel_id) {
            None => return Err(NepstayError::invalid_field("hostelId", "Hostel ID is required")),
            Some(id) if !is_valid_id(id) => {
                return Err(NepstayError::invalid_field("hostelId", "Invalid hostel ID"));
            }
            Some(id) => id,
        };

        let hostel = self.storage.increment_clicks(hostel_id).await?;
        Ok(ClickResult {
            id: hostel.id,
            name: hostel.name,
            clicks: hostel.clicks,
        })
    }

    /// 管理端统计
    pub async fn stats(&self) -> Result<HostelStats> {
        let hostels = self.storage.load_hostels_for_analytics(false, None).await?;
        Ok(compute_hostel_stats(&hostels, chrono::Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> HostelPayload {
        serde_json::from_value(serde_json::json!({
            "name": "  Kathmandu Backpackers ",
            "description": "Cozy dorms in the heart of Thamel",
            "images": ["https://img.example.com/a.jpg"],
            "pricePerNight": 850,
            "totalBeds": 24,
            "contactInfo": {"email": " Hello@KBP.com ", "whatsapp": "+977 984-123-4567", "website": ""},
            "location": {"city": "Kathmandu", "area": " Thamel "},
            "facilities": [" WiFi ", "", "Hot Water"]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_payload_is_normalized() {
        let new = valid_payload().into_new_hostel().unwrap();
        assert_eq!(new.name, "Kathmandu Backpackers");
        assert_eq!(new.contact_info.email.as_deref(), Some("hello@kbp.com"));
        assert!(new.contact_info.website.is_none());
        assert_eq!(new.location.area.as_deref(), Some("Thamel"));
        assert_eq!(new.facilities, vec!["WiFi", "Hot Water"]);
        assert!(new.is_active);
        assert!(!new.featured);
    }

    #[test]
    fn test_legacy_field_aliases() {
        let payload: HostelPayload = serde_json::from_value(serde_json::json!({
            "name": "Legacy Inn",
            "description": "Old client",
            "price": 500,
            "totalBeds": 4,
            "contact": {"phone": "9800000000"},
            "address": "Lakeside, Pokhara"
        }))
        .unwrap();
        let new = payload.into_new_hostel().unwrap();
        assert_eq!(new.price_per_night, 500.0);
        assert_eq!(new.contact_info.phone.as_deref(), Some("9800000000"));
        assert_eq!(new.location.address.as_deref(), Some("Lakeside, Pokhara"));
    }

    #[test]
    fn test_create_reports_all_missing_fields() {
        let err = HostelPayload::default().into_new_hostel().unwrap_err();
        let fields: Vec<&str> = err
            .details()
            .unwrap()
            .iter()
            .map(|d| d.field.as_str())
            .collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"pricePerNight"));
        assert!(fields.contains(&"totalBeds"));
    }

    #[test]
    fn test_field_rules() {
        let mut payload = valid_payload();
        payload.price_per_night = Some(-1.0);
        payload.total_beds = Some(0);
        payload.images = Some(vec!["ftp://nope".into()]);
        payload.contact_info = Some(ContactInfo {
            whatsapp: Some("12345".into()),
            facebook: Some("https://twitter.com/x".into()),
            ..Default::default()
        });
        payload.location = Some(Location {
            google_maps_url: Some("https://maps.google.com/?q=1".into()),
            ..Default::default()
        });
        payload.facilities = Some(vec!["x".repeat(51)]);

        let err = payload.into_new_hostel().unwrap_err();
        let fields: Vec<String> = err
            .details()
            .unwrap()
            .iter()
            .map(|d| d.field.clone())
            .collect();
        for expected in [
            "pricePerNight",
            "totalBeds",
            "images.0",
            "contactInfo.whatsapp",
            "contactInfo.facebook",
            "location.googleMapsUrl",
            "facilities.0",
        ] {
            assert!(fields.iter().any(|f| f == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_too_many_images_and_facilities() {
        let mut payload = valid_payload();
        payload.images = Some(vec!["https://img.example.com/a.jpg".into(); 11]);
        payload.facilities = Some((0..21).map(|i| format!("f{}", i)).collect());
        let err = payload.into_new_hostel().unwrap_err();
        let message = err.message().to_string();
        assert!(message.contains("Maximum 10 images allowed"));
        assert!(message.contains("Maximum 20 facilities allowed"));
    }

    #[test]
    fn test_update_requires_a_field() {
        let err = HostelPayload::default().into_changes().unwrap_err();
        assert!(matches!(err, NepstayError::Validation { .. }));
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        let payload = HostelPayload {
            total_beds: Some(10),
            ..Default::default()
        };
        let changes = payload.into_changes().unwrap();
        assert_eq!(changes.total_beds, Some(10));
        assert!(changes.name.is_none());

        let payload = HostelPayload {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(payload.into_changes().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let search = HostelListQuery::default().into_search().unwrap();
        assert_eq!(search.page, 1);
        assert_eq!(search.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(search.sort, HostelSort::default());
        assert!(search.filter.search.is_none());
        assert!(search.filter.facilities.is_empty());
    }

    #[test]
    fn test_list_query_parsing() {
        let query = HostelListQuery {
            search: Some("  thamel ".into()),
            min_price: Some("500".into()),
            facilities: Some("wifi, ,locker".into()),
            featured: Some("true".into()),
            sort_by: Some("-price".into()),
            page: Some("2".into()),
            limit: Some("5".into()),
            ..Default::default()
        };
        let search = query.into_search().unwrap();
        assert_eq!(search.filter.search.as_deref(), Some("thamel"));
        assert_eq!(search.filter.min_price, Some(500.0));
        assert_eq!(search.filter.facilities, vec!["wifi", "locker"]);
        assert_eq!(search.filter.featured, Some(true));
        assert_eq!(search.sort.to_string(), "-price");
        assert_eq!((search.page, search.limit), (2, 5));
    }

    #[test]
    fn test_list_query_rejects_bad_values() {
        let query = HostelListQuery {
            sort_by: Some("name".into()),
            page: Some("0".into()),
            limit: Some("51".into()),
            min_price: Some("-5".into()),
            featured: Some("maybe".into()),
            ..Default::default()
        };
        let err = query.into_search().unwrap_err();
        assert!(matches!(err, NepstayError::QueryValidation { .. }));
        assert_eq!(err.details().map(<[_]>::len), Some(5));
    }

    #[test]
    fn test_showcase_limit() {
        assert_eq!(ShowcaseQuery::default().limit().unwrap(), 6);
        assert_eq!(
            ShowcaseQuery { limit: Some("3".into()) }.limit().unwrap(),
            3
        );
        assert!(ShowcaseQuery { limit: Some("abc".into()) }.limit().is_err());
    }
}
