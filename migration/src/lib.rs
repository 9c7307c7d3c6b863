pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_hostels_table;
mod m20260301_000002_admins_table;
mod m20260302_000001_hostel_search_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_hostels_table::Migration),
            Box::new(m20260301_000002_admins_table::Migration),
            Box::new(m20260302_000001_hostel_search_index::Migration),
        ]
    }
}
