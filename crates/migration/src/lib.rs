//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_catalogs;
mod m20250101_000002_create_rating_level;
mod m20250101_000003_create_organization;
mod m20250101_000004_create_org_structure;
mod m20250101_000005_create_org_ratings;
mod m20250101_000006_create_analysis;
mod m20250101_000007_create_system_users;
mod m20250101_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_catalogs::Migration),
            Box::new(m20250101_000002_create_rating_level::Migration),
            Box::new(m20250101_000003_create_organization::Migration),
            Box::new(m20250101_000004_create_org_structure::Migration),
            Box::new(m20250101_000005_create_org_ratings::Migration),
            Box::new(m20250101_000006_create_analysis::Migration),
            Box::new(m20250101_000007_create_system_users::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000008_add_indexes::Migration),
        ]
    }
}
