//! Create the shared catalog tables: departments, macroprocesses, processes,
//! IT services, IT asset categories, IT assets and security threats.
//!
//! Catalog rows are referenced by organization-scoped tables and are never
//! deleted through the API, so their FKs restrict deletion.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessDepartment::Table)
                    .if_not_exists()
                    .col(pk_auto(BusinessDepartment::Id))
                    .col(string_len(BusinessDepartment::Name, 128).unique_key().not_null())
                    .col(timestamp_with_time_zone(BusinessDepartment::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(BusinessDepartment::LastModifiedOn).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessMacroprocess::Table)
                    .if_not_exists()
                    .col(pk_auto(BusinessMacroprocess::Id))
                    .col(string_len(BusinessMacroprocess::Name, 128).unique_key().not_null())
                    .col(timestamp_with_time_zone(BusinessMacroprocess::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(BusinessMacroprocess::LastModifiedOn).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessProcess::Table)
                    .if_not_exists()
                    .col(pk_auto(BusinessProcess::Id))
                    .col(string_len(BusinessProcess::Name, 128).unique_key().not_null())
                    .col(timestamp_with_time_zone(BusinessProcess::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(BusinessProcess::LastModifiedOn).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItService::Table)
                    .if_not_exists()
                    .col(pk_auto(ItService::Id))
                    .col(string_len(ItService::Name, 128).unique_key().not_null())
                    .col(timestamp_with_time_zone(ItService::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(ItService::LastModifiedOn).not_null())
                    .to_owned(),
            )
            .await?;

        // Category ids are chosen by the client, so no auto increment here.
        manager
            .create_table(
                Table::create()
                    .table(ItAssetCategory::Table)
                    .if_not_exists()
                    .col(integer(ItAssetCategory::Id).primary_key())
                    .col(string_len(ItAssetCategory::Name, 128).unique_key().not_null())
                    .col(timestamp_with_time_zone(ItAssetCategory::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(ItAssetCategory::LastModifiedOn).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItAsset::Table)
                    .if_not_exists()
                    .col(pk_auto(ItAsset::Id))
                    .col(integer(ItAsset::CategoryId).not_null())
                    .col(string_len(ItAsset::Name, 128).unique_key().not_null())
                    .col(ColumnDef::new(ItAsset::Description).text().null())
                    .col(timestamp_with_time_zone(ItAsset::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(ItAsset::LastModifiedOn).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_it_asset_category")
                            .from(ItAsset::Table, ItAsset::CategoryId)
                            .to(ItAssetCategory::Table, ItAssetCategory::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SecurityThreat::Table)
                    .if_not_exists()
                    .col(pk_auto(SecurityThreat::Id))
                    .col(string_len(SecurityThreat::Name, 128).unique_key().not_null())
                    .col(ColumnDef::new(SecurityThreat::Description).text().null())
                    .col(timestamp_with_time_zone(SecurityThreat::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(SecurityThreat::LastModifiedOn).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SecurityThreat::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ItAsset::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ItAssetCategory::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ItService::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(BusinessProcess::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(BusinessMacroprocess::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(BusinessDepartment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BusinessDepartment { Table, Id, Name, CreatedOn, LastModifiedOn }

#[derive(DeriveIden)]
enum BusinessMacroprocess { Table, Id, Name, CreatedOn, LastModifiedOn }

#[derive(DeriveIden)]
enum BusinessProcess { Table, Id, Name, CreatedOn, LastModifiedOn }

#[derive(DeriveIden)]
enum ItService { Table, Id, Name, CreatedOn, LastModifiedOn }

#[derive(DeriveIden)]
enum ItAssetCategory { Table, Id, Name, CreatedOn, LastModifiedOn }

#[derive(DeriveIden)]
enum ItAsset { Table, Id, CategoryId, Name, Description, CreatedOn, LastModifiedOn }

#[derive(DeriveIden)]
enum SecurityThreat { Table, Id, Name, Description, CreatedOn, LastModifiedOn }
