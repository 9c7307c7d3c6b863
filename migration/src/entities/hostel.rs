use sea_orm::entity::prelude::*;

/// `images` 与 `facilities` 以 JSON 数组文本存储，由 storage 层负责编解码；
/// `facility_tags` 是 facilities 的小写检索形式（`\n` 分隔，首尾各一个 `\n`）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hostels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub short_description: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub images: String,
    #[sea_orm(column_type = "Double")]
    pub price_per_night: f64,
    pub total_beds: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact_phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact_email: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact_whatsapp: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact_facebook: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact_instagram: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact_website: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub location_city: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub location_area: Option<String>,
    pub location_address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub location_google_maps_url: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub facilities: String,
    #[sea_orm(column_type = "Text")]
    pub facility_tags: String,
    pub featured: bool,
    pub clicks: i64,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
