use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;
use sea_orm_migration::sea_orm::sea_query::{IndexCreateStatement, IndexOrder};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_index(featured_clicks_index()).await?;

        // PostgreSQL: pg_trgm + GIN 索引支持 LIKE '%keyword%'
        // MySQL / SQLite 规模较小，子串匹配直接全表扫描
        if manager.get_database_backend() == DatabaseBackend::Postgres {
            let conn = manager.get_connection();
            conn.execute_unprepared("CREATE EXTENSION IF NOT EXISTS pg_trgm")
                .await?;

            conn.execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_hostels_name_trgm ON hostels USING GIN (LOWER(name) gin_trgm_ops)",
            )
            .await?;

            conn.execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_hostels_facility_tags_trgm ON hostels USING GIN (facility_tags gin_trgm_ops)",
            )
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == DatabaseBackend::Postgres {
            let conn = manager.get_connection();
            conn.execute_unprepared("DROP INDEX IF EXISTS idx_hostels_facility_tags_trgm")
                .await?;
            conn.execute_unprepared("DROP INDEX IF EXISTS idx_hostels_name_trgm")
                .await?;
        }

        manager
            .drop_index(
                Index::drop()
                    .name("idx_hostels_featured_clicks")
                    .table(Hostel::Table)
                    .to_owned(),
            )
            .await
    }
}

/// 所有数据库：精选/热门排序复合索引 (featured DESC, clicks DESC)
fn featured_clicks_index() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name("idx_hostels_featured_clicks")
        .table(Hostel::Table)
        .col((Hostel::Featured, IndexOrder::Desc))
        .col((Hostel::Clicks, IndexOrder::Desc))
        .to_owned()
}

#[derive(DeriveIden)]
enum Hostel {
    #[sea_orm(iden = "hostels")]
    Table,
    Featured,
    Clicks,
}
