use tracing::warn;

use crate::storage::models::{Admin, ContactInfo, Hostel, Location, NewHostel};
use migration::entities::{admin, hostel};

/// JSON 数组文本 → Vec<String>，损坏数据按空列表处理
fn decode_list(raw: &str, column: &str, id: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Corrupted {} column for hostel {}: {}", column, id, e);
        Vec::new()
    })
}

pub(crate) fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

const TAG_SEPARATOR: char = '\n';

/// 设施名 / 检索词的统一形式：小写，控制字符替换为空格
pub(crate) fn normalize_facility(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// facilities → facility_tags 检索列
///
/// 每个标签两侧都是分隔符，不含分隔符的检索词只能命中单个标签
pub(crate) fn encode_facility_tags(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from(TAG_SEPARATOR);
    for item in items {
        out.push_str(&normalize_facility(item));
        out.push(TAG_SEPARATOR);
    }
    out
}

/// 将 Sea-ORM Model 转换为 Hostel
pub fn model_to_hostel(model: hostel::Model) -> Hostel {
    let images = decode_list(&model.images, "images", &model.id);
    let facilities = decode_list(&model.facilities, "facilities", &model.id);

    Hostel {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        short_description: model.short_description,
        images,
        price_per_night: model.price_per_night,
        total_beds: model.total_beds,
        contact_info: ContactInfo {
            phone: model.contact_phone,
            email: model.contact_email,
            whatsapp: model.contact_whatsapp,
            facebook: model.contact_facebook,
            instagram: model.contact_instagram,
            website: model.contact_website,
        },
        location: Location {
            city: model.location_city,
            area: model.location_area,
            address: model.location_address,
            google_maps_url: model.location_google_maps_url,
        },
        facilities,
        featured: model.featured,
        clicks: model.clicks.max(0) as u64,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 将 NewHostel 转换为 ActiveModel（用于插入）
pub fn hostel_to_active_model(id: String, slug: String, new: &NewHostel) -> hostel::ActiveModel {
    use sea_orm::ActiveValue::*;

    let now = chrono::Utc::now();
    hostel::ActiveModel {
        id: Set(id),
        name: Set(new.name.clone()),
        slug: Set(slug),
        description: Set(new.description.clone()),
        short_description: Set(new.short_description.clone()),
        images: Set(encode_list(&new.images)),
        price_per_night: Set(new.price_per_night),
        total_beds: Set(new.total_beds),
        contact_phone: Set(new.contact_info.phone.clone()),
        contact_email: Set(new.contact_info.email.clone()),
        contact_whatsapp: Set(new.contact_info.whatsapp.clone()),
        contact_facebook: Set(new.contact_info.facebook.clone()),
        contact_instagram: Set(new.contact_info.instagram.clone()),
        contact_website: Set(new.contact_info.website.clone()),
        location_city: Set(new.location.city.clone()),
        location_area: Set(new.location.area.clone()),
        location_address: Set(new.location.address.clone()),
        location_google_maps_url: Set(new.location.google_maps_url.clone()),
        facilities: Set(encode_list(&new.facilities)),
        facility_tags: Set(encode_facility_tags(&new.facilities)),
        featured: Set(new.featured),
        clicks: Set(0),
        is_active: Set(new.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// 将 Sea-ORM Model 转换为 Admin
pub fn model_to_admin(model: admin::Model) -> Admin {
    Admin {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        role: model.role,
        is_active: model.is_active,
        last_login: model.last_login,
        login_attempts: model.login_attempts.max(0) as u32,
        lock_until: model.lock_until,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
