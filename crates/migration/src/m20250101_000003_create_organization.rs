//! Create the `organization` table.
//!
//! Root entity for everything risk-related; organization-scoped tables
//! cascade away when an organization is deleted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(pk_auto(Organization::Id))
                    .col(string_len(Organization::TaxId, 16).unique_key().not_null())
                    .col(string_len(Organization::LegalName, 128).not_null())
                    .col(ColumnDef::new(Organization::TradeName).string_len(128).null())
                    .col(timestamp_with_time_zone(Organization::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(Organization::LastModifiedOn).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Organization::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Organization { Table, Id, TaxId, LegalName, TradeName, CreatedOn, LastModifiedOn }
