use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::sea_query::TableCreateStatement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(hostels_table()).await?;

        // 创建时间索引（最新列表、增长统计）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hostels_created_at")
                    .table(Hostel::Table)
                    .col(Hostel::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 价格区间过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hostels_price")
                    .table(Hostel::Table)
                    .col(Hostel::PricePerNight)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hostels_is_active")
                    .table(Hostel::Table)
                    .col(Hostel::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_hostels_is_active").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_hostels_price").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_hostels_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Hostel::Table).to_owned())
            .await
    }
}

/// hostels 表结构；可变长度的联系方式与位置字段使用 TEXT
fn hostels_table() -> TableCreateStatement {
    Table::create()
        .table(Hostel::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Hostel::Id)
                .string_len(36)
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Hostel::Name).string_len(100).not_null())
        .col(
            ColumnDef::new(Hostel::Slug)
                .string_len(160)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Hostel::Description).text().not_null())
        .col(ColumnDef::new(Hostel::ShortDescription).string_len(200).null())
        .col(ColumnDef::new(Hostel::Images).text().not_null())
        .col(ColumnDef::new(Hostel::PricePerNight).double().not_null())
        .col(ColumnDef::new(Hostel::TotalBeds).integer().not_null())
        .col(ColumnDef::new(Hostel::ContactPhone).text().null())
        .col(ColumnDef::new(Hostel::ContactEmail).text().null())
        .col(ColumnDef::new(Hostel::ContactWhatsapp).text().null())
        .col(ColumnDef::new(Hostel::ContactFacebook).text().null())
        .col(ColumnDef::new(Hostel::ContactInstagram).text().null())
        .col(ColumnDef::new(Hostel::ContactWebsite).text().null())
        .col(ColumnDef::new(Hostel::LocationCity).text().null())
        .col(ColumnDef::new(Hostel::LocationArea).text().null())
        .col(ColumnDef::new(Hostel::LocationAddress).string_len(200).null())
        .col(ColumnDef::new(Hostel::LocationGoogleMapsUrl).text().null())
        .col(ColumnDef::new(Hostel::Facilities).text().not_null())
        .col(ColumnDef::new(Hostel::FacilityTags).text().not_null())
        .col(
            ColumnDef::new(Hostel::Featured)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Hostel::Clicks)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Hostel::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Hostel::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Hostel::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Hostel {
    #[sea_orm(iden = "hostels")]
    Table,
    Id,
    Name,
    Slug,
    Description,
    ShortDescription,
    Images,
    PricePerNight,
    TotalBeds,
    ContactPhone,
    ContactEmail,
    ContactWhatsapp,
    ContactFacebook,
    ContactInstagram,
    ContactWebsite,
    LocationCity,
    LocationArea,
    LocationAddress,
    LocationGoogleMapsUrl,
    Facilities,
    FacilityTags,
    Featured,
    Clicks,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
