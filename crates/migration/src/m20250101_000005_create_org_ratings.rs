//! Create the organization-level rating tables: security threats attached to
//! an organization and vulnerabilities recorded against IT asset instances.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganizationSecurityThreat::Table)
                    .if_not_exists()
                    .col(pk_auto(OrganizationSecurityThreat::Id))
                    .col(integer(OrganizationSecurityThreat::OrganizationId).not_null())
                    .col(integer(OrganizationSecurityThreat::SecurityThreatId).not_null())
                    .col(
                        ColumnDef::new(OrganizationSecurityThreat::ThreatLevelId)
                            .small_integer()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(OrganizationSecurityThreat::CreatedOn).not_null())
                    .col(
                        timestamp_with_time_zone(OrganizationSecurityThreat::LastModifiedOn)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_security_threat_organization")
                            .from(
                                OrganizationSecurityThreat::Table,
                                OrganizationSecurityThreat::OrganizationId,
                            )
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_security_threat_threat")
                            .from(
                                OrganizationSecurityThreat::Table,
                                OrganizationSecurityThreat::SecurityThreatId,
                            )
                            .to(SecurityThreat::Table, SecurityThreat::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_security_threat_level")
                            .from(
                                OrganizationSecurityThreat::Table,
                                OrganizationSecurityThreat::ThreatLevelId,
                            )
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
                    .table(OrganizationItAssetVulnerability::Table)
                    .if_not_exists()
                    .col(pk_auto(OrganizationItAssetVulnerability::Id))
                    .col(integer(OrganizationItAssetVulnerability::ItAssetInstanceId).not_null())
                    .col(ColumnDef::new(OrganizationItAssetVulnerability::Description).text().null())
                    .col(
                        ColumnDef::new(OrganizationItAssetVulnerability::VulnerabilityLevelId)
                            .small_integer()
                            .null(),
                    )
                    .col(
                        timestamp_with_time_zone(OrganizationItAssetVulnerability::CreatedOn)
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(OrganizationItAssetVulnerability::LastModifiedOn)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_vulnerability_asset_instance")
                            .from(
                                OrganizationItAssetVulnerability::Table,
                                OrganizationItAssetVulnerability::ItAssetInstanceId,
                            )
                            .to(OrganizationItAsset::Table, OrganizationItAsset::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_vulnerability_level")
                            .from(
                                OrganizationItAssetVulnerability::Table,
                                OrganizationItAssetVulnerability::VulnerabilityLevelId,
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
            .drop_table(Table::drop().table(OrganizationItAssetVulnerability::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrganizationSecurityThreat::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrganizationSecurityThreat {
    Table,
    Id,
    OrganizationId,
    SecurityThreatId,
    ThreatLevelId,
    CreatedOn,
    LastModifiedOn,
}

#[derive(DeriveIden)]
enum OrganizationItAssetVulnerability {
    Table,
    Id,
    ItAssetInstanceId,
    Description,
    VulnerabilityLevelId,
    CreatedOn,
    LastModifiedOn,
}

#[derive(DeriveIden)]
enum Organization { Table, Id }

#[derive(DeriveIden)]
enum SecurityThreat { Table, Id }

#[derive(DeriveIden)]
enum OrganizationItAsset { Table, Id }

#[derive(DeriveIden)]
enum RatingLevel { Table, Id }
