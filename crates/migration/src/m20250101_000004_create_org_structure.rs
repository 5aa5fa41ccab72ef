//! Create the organization structure tables, one level per table:
//! department -> macroprocess -> process -> IT service -> IT asset, plus the
//! IT service / IT asset link that carries the asset relevance rating.
//!
//! Instance tables cascade from their parent instance, so detaching a
//! department takes its whole subtree with it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganizationDepartment::Table)
                    .if_not_exists()
                    .col(integer(OrganizationDepartment::OrganizationId).not_null())
                    .col(integer(OrganizationDepartment::DepartmentId).not_null())
                    .col(timestamp_with_time_zone(OrganizationDepartment::CreatedOn).not_null())
                    .primary_key(
                        Index::create()
                            .col(OrganizationDepartment::OrganizationId)
                            .col(OrganizationDepartment::DepartmentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_department_organization")
                            .from(OrganizationDepartment::Table, OrganizationDepartment::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_department_department")
                            .from(OrganizationDepartment::Table, OrganizationDepartment::DepartmentId)
                            .to(BusinessDepartment::Table, BusinessDepartment::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationMacroprocess::Table)
                    .if_not_exists()
                    .col(pk_auto(OrganizationMacroprocess::Id))
                    .col(integer(OrganizationMacroprocess::OrganizationId).not_null())
                    .col(integer(OrganizationMacroprocess::DepartmentId).not_null())
                    .col(integer(OrganizationMacroprocess::MacroprocessId).not_null())
                    .col(timestamp_with_time_zone(OrganizationMacroprocess::CreatedOn).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_macroprocess_department_instance")
                            .from(
                                OrganizationMacroprocess::Table,
                                (
                                    OrganizationMacroprocess::OrganizationId,
                                    OrganizationMacroprocess::DepartmentId,
                                ),
                            )
                            .to(
                                OrganizationDepartment::Table,
                                (
                                    OrganizationDepartment::OrganizationId,
                                    OrganizationDepartment::DepartmentId,
                                ),
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_macroprocess_macroprocess")
                            .from(OrganizationMacroprocess::Table, OrganizationMacroprocess::MacroprocessId)
                            .to(BusinessMacroprocess::Table, BusinessMacroprocess::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationProcess::Table)
                    .if_not_exists()
                    .col(pk_auto(OrganizationProcess::Id))
                    .col(integer(OrganizationProcess::OrganizationId).not_null())
                    .col(integer(OrganizationProcess::MacroprocessInstanceId).not_null())
                    .col(integer(OrganizationProcess::ProcessId).not_null())
                    .col(ColumnDef::new(OrganizationProcess::RelevanceLevelId).small_integer().null())
                    .col(timestamp_with_time_zone(OrganizationProcess::CreatedOn).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_process_organization")
                            .from(OrganizationProcess::Table, OrganizationProcess::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_process_macroprocess_instance")
                            .from(OrganizationProcess::Table, OrganizationProcess::MacroprocessInstanceId)
                            .to(OrganizationMacroprocess::Table, OrganizationMacroprocess::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_process_process")
                            .from(OrganizationProcess::Table, OrganizationProcess::ProcessId)
                            .to(BusinessProcess::Table, BusinessProcess::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_process_relevance_level")
                            .from(OrganizationProcess::Table, OrganizationProcess::RelevanceLevelId)
                            .to(RatingLevel::Table, RatingLevel::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationItService::Table)
                    .if_not_exists()
                    .col(pk_auto(OrganizationItService::Id))
                    .col(integer(OrganizationItService::OrganizationId).not_null())
                    .col(integer(OrganizationItService::ProcessInstanceId).not_null())
                    .col(integer(OrganizationItService::ItServiceId).not_null())
                    .col(ColumnDef::new(OrganizationItService::RelevanceLevelId).small_integer().null())
                    .col(timestamp_with_time_zone(OrganizationItService::CreatedOn).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_it_service_organization")
                            .from(OrganizationItService::Table, OrganizationItService::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_it_service_process_instance")
                            .from(OrganizationItService::Table, OrganizationItService::ProcessInstanceId)
                            .to(OrganizationProcess::Table, OrganizationProcess::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_it_service_it_service")
                            .from(OrganizationItService::Table, OrganizationItService::ItServiceId)
                            .to(ItService::Table, ItService::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_it_service_relevance_level")
                            .from(OrganizationItService::Table, OrganizationItService::RelevanceLevelId)
                            .to(RatingLevel::Table, RatingLevel::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationItAsset::Table)
                    .if_not_exists()
                    .col(pk_auto(OrganizationItAsset::Id))
                    .col(integer(OrganizationItAsset::OrganizationId).not_null())
                    .col(integer(OrganizationItAsset::ItAssetId).not_null())
                    .col(ColumnDef::new(OrganizationItAsset::RelevanceLevelId).small_integer().null())
                    .col(timestamp_with_time_zone(OrganizationItAsset::CreatedOn).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_it_asset_organization")
                            .from(OrganizationItAsset::Table, OrganizationItAsset::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_it_asset_it_asset")
                            .from(OrganizationItAsset::Table, OrganizationItAsset::ItAssetId)
                            .to(ItAsset::Table, ItAsset::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_it_asset_relevance_level")
                            .from(OrganizationItAsset::Table, OrganizationItAsset::RelevanceLevelId)
                            .to(RatingLevel::Table, RatingLevel::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationItServiceItAsset::Table)
                    .if_not_exists()
                    .col(integer(OrganizationItServiceItAsset::ItServiceInstanceId).not_null())
                    .col(integer(OrganizationItServiceItAsset::ItAssetInstanceId).not_null())
                    .col(
                        ColumnDef::new(OrganizationItServiceItAsset::RelevanceLevelId)
                            .small_integer()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(OrganizationItServiceItAsset::CreatedOn).not_null())
                    .primary_key(
                        Index::create()
                            .col(OrganizationItServiceItAsset::ItServiceInstanceId)
                            .col(OrganizationItServiceItAsset::ItAssetInstanceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_service_asset_service_instance")
                            .from(
                                OrganizationItServiceItAsset::Table,
                                OrganizationItServiceItAsset::ItServiceInstanceId,
                            )
                            .to(OrganizationItService::Table, OrganizationItService::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_service_asset_asset_instance")
                            .from(
                                OrganizationItServiceItAsset::Table,
                                OrganizationItServiceItAsset::ItAssetInstanceId,
                            )
                            .to(OrganizationItAsset::Table, OrganizationItAsset::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_service_asset_relevance_level")
                            .from(
                                OrganizationItServiceItAsset::Table,
                                OrganizationItServiceItAsset::RelevanceLevelId,
                            )
                            .to(RatingLevel::Table, RatingLevel::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizationItServiceItAsset::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(OrganizationItAsset::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(OrganizationItService::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(OrganizationProcess::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(OrganizationMacroprocess::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(OrganizationDepartment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrganizationDepartment { Table, OrganizationId, DepartmentId, CreatedOn }

#[derive(DeriveIden)]
enum OrganizationMacroprocess { Table, Id, OrganizationId, DepartmentId, MacroprocessId, CreatedOn }

#[derive(DeriveIden)]
enum OrganizationProcess {
    Table,
    Id,
    OrganizationId,
    MacroprocessInstanceId,
    ProcessId,
    RelevanceLevelId,
    CreatedOn,
}

#[derive(DeriveIden)]
enum OrganizationItService {
    Table,
    Id,
    OrganizationId,
    ProcessInstanceId,
    ItServiceId,
    RelevanceLevelId,
    CreatedOn,
}

#[derive(DeriveIden)]
enum OrganizationItAsset { Table, Id, OrganizationId, ItAssetId, RelevanceLevelId, CreatedOn }

#[derive(DeriveIden)]
enum OrganizationItServiceItAsset {
    Table,
    ItServiceInstanceId,
    ItAssetInstanceId,
    RelevanceLevelId,
    CreatedOn,
}

#[derive(DeriveIden)]
enum Organization { Table, Id }

#[derive(DeriveIden)]
enum BusinessDepartment { Table, Id }

#[derive(DeriveIden)]
enum BusinessMacroprocess { Table, Id }

#[derive(DeriveIden)]
enum BusinessProcess { Table, Id }

#[derive(DeriveIden)]
enum ItService { Table, Id }

#[derive(DeriveIden)]
enum ItAsset { Table, Id }

#[derive(DeriveIden)]
enum RatingLevel { Table, Id }
