//! Hostel write operations for SeaOrmStorage

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ExprTrait, QueryFilter, sea_query::Expr,
};
use tracing::info;

use super::converters::{
    encode_facility_tags, encode_list, hostel_to_active_model, model_to_hostel,
};
use super::{SeaOrmStorage, retry};
use crate::errors::{NepstayError, Result};
use crate::storage::models::{Hostel, HostelChanges, NewHostel};
use crate::utils::generate_slug;

use migration::entities::hostel;

impl SeaOrmStorage {
    /// 新建酒店：分配 UUID 与 slug
    pub async fn create_hostel(&self, new: &NewHostel) -> Result<Hostel> {
        let db = &self.db;
        let id = uuid::Uuid::new_v4().to_string();
        let slug = generate_slug(&new.name);
        let active_model = hostel_to_active_model(id, slug, new);

        let model = retry::with_write_retry("create_hostel", self.retry_config, || async {
            active_model.clone().insert(db).await
        })
        .await?;

        self.invalidate_count_cache();
        info!("Hostel created: {} ({})", model.name, model.slug);
        Ok(model_to_hostel(model))
    }

    /// 部分更新，slug 保持不变
    pub async fn update_hostel(&self, id: &str, changes: HostelChanges) -> Result<Hostel> {
        let db = &self.db;
        let existing = retry::with_retry("update_hostel(find)", self.retry_config, || async {
            hostel::Entity::find_by_id(id.to_string()).one(db).await
        })
        .await?
        .ok_or_else(NepstayError::hostel_not_found)?;

        let mut active_model: hostel::ActiveModel = existing.into();
        apply_changes(&mut active_model, changes);

        let model = retry::with_retry("update_hostel(save)", self.retry_config, || async {
            active_model.clone().update(db).await
        })
        .await?;

        self.invalidate_count_cache();
        info!("Hostel updated: {}", model.id);
        Ok(model_to_hostel(model))
    }

    pub async fn delete_hostel(&self, id: &str) -> Result<()> {
        let db = &self.db;
        let result = retry::with_write_retry(&format!("delete_hostel({})", id), self.retry_config, || async {
            hostel::Entity::delete_by_id(id.to_string()).exec(db).await
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(NepstayError::hostel_not_found());
        }

        self.invalidate_count_cache();
        info!("Hostel deleted: {}", id);
        Ok(())
    }

    /// featured = NOT featured（单条原子更新）
    pub async fn toggle_featured(&self, id: &str) -> Result<Hostel> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_write_retry("toggle_featured", self.retry_config, || async {
            hostel::Entity::update_many()
                .col_expr(hostel::Column::Featured, Expr::col(hostel::Column::Featured).not())
                .col_expr(hostel::Column::UpdatedAt, Expr::value(now))
                .filter(hostel::Column::Id.eq(id))
                .exec(db)
                .await
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(NepstayError::hostel_not_found());
        }

        self.invalidate_count_cache();
        self.find_hostel_by_id(id)
            .await?
            .ok_or_else(NepstayError::hostel_not_found)
    }

    /// clicks = clicks + 1，仅对已上架酒店生效
    pub async fn increment_clicks(&self, id: &str) -> Result<Hostel> {
        let db = &self.db;
        let result = retry::with_write_retry("increment_clicks", self.retry_config, || async {
            hostel::Entity::update_many()
                .col_expr(hostel::Column::Clicks, Expr::col(hostel::Column::Clicks).add(1))
                .filter(hostel::Column::Id.eq(id))
                .filter(hostel::Column::IsActive.eq(true))
                .exec(db)
                .await
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(NepstayError::hostel_not_found());
        }

        self.find_hostel_by_id(id)
            .await?
            .ok_or_else(NepstayError::hostel_not_found)
    }
}

fn apply_changes(am: &mut hostel::ActiveModel, changes: HostelChanges) {
    use sea_orm::ActiveValue::Set;

    if let Some(name) = changes.name {
        am.name = Set(name);
    }
    if let Some(description) = changes.description {
        am.description = Set(description);
    }
    if let Some(short_description) = changes.short_description {
        am.short_description = Set(Some(short_description));
    }
    if let Some(images) = changes.images {
        am.images = Set(encode_list(&images));
    }
    if let Some(price) = changes.price_per_night {
        am.price_per_night = Set(price);
    }
    if let Some(beds) = changes.total_beds {
        am.total_beds = Set(beds);
    }
    if let Some(contact) = changes.contact_info {
        am.contact_phone = Set(contact.phone);
        am.contact_email = Set(contact.email);
        am.contact_whatsapp = Set(contact.whatsapp);
        am.contact_facebook = Set(contact.facebook);
        am.contact_instagram = Set(contact.instagram);
        am.contact_website = Set(contact.website);
    }
    if let Some(location) = changes.location {
        am.location_city = Set(location.city);
        am.location_area = Set(location.area);
        am.location_address = Set(location.address);
        am.location_google_maps_url = Set(location.google_maps_url);
    }
    if let Some(facilities) = changes.facilities {
        am.facilities = Set(encode_list(&facilities));
        am.facility_tags = Set(encode_facility_tags(&facilities));
    }
    if let Some(featured) = changes.featured {
        am.featured = Set(featured);
    }
    if let Some(is_active) = changes.is_active {
        am.is_active = Set(is_active);
    }
    am.updated_at = Set(Utc::now());
}
