//! Create the risk analysis tables.
//!
//! `organization_analysis_detail` stores a denormalized snapshot per rated
//! combination, so details stay stable after catalogs or ratings change.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganizationAnalysis::Table)
                    .if_not_exists()
                    .col(pk_auto(OrganizationAnalysis::Id))
                    .col(integer(OrganizationAnalysis::OrganizationId).not_null())
                    .col(ColumnDef::new(OrganizationAnalysis::Description).text().null())
                    .col(
                        ColumnDef::new(OrganizationAnalysis::AnalysisPerformedOn)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(integer(OrganizationAnalysis::TotalProcessedItems).not_null())
                    .col(timestamp_with_time_zone(OrganizationAnalysis::CreatedOn).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_analysis_organization")
                            .from(OrganizationAnalysis::Table, OrganizationAnalysis::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationAnalysisDetail::Table)
                    .if_not_exists()
                    .col(big_integer(OrganizationAnalysisDetail::Id).primary_key().auto_increment())
                    .col(integer(OrganizationAnalysisDetail::AnalysisId).not_null())
                    .col(string_len(OrganizationAnalysisDetail::ItAssetName, 128).not_null())
                    .col(string_len(OrganizationAnalysisDetail::ItServiceName, 128).not_null())
                    .col(string_len(OrganizationAnalysisDetail::ProcessName, 128).not_null())
                    .col(string_len(OrganizationAnalysisDetail::MacroprocessName, 128).not_null())
                    .col(string_len(OrganizationAnalysisDetail::DepartmentName, 128).not_null())
                    .col(string_len(OrganizationAnalysisDetail::SecurityThreatName, 128).not_null())
                    .col(small_integer(OrganizationAnalysisDetail::ItAssetRelevance).not_null())
                    .col(small_integer(OrganizationAnalysisDetail::ItServiceRelevance).not_null())
                    .col(small_integer(OrganizationAnalysisDetail::ProcessRelevance).not_null())
                    .col(small_integer(OrganizationAnalysisDetail::SecurityThreatLevel).not_null())
                    .col(
                        small_integer(OrganizationAnalysisDetail::ItAssetVulnerabilityLevel)
                            .not_null(),
                    )
                    .col(double(OrganizationAnalysisDetail::CalculatedImpact).not_null())
                    .col(double(OrganizationAnalysisDetail::CalculatedProbability).not_null())
                    .col(double(OrganizationAnalysisDetail::CalculatedRisk).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_analysis_detail_analysis")
                            .from(
                                OrganizationAnalysisDetail::Table,
                                OrganizationAnalysisDetail::AnalysisId,
                            )
                            .to(OrganizationAnalysis::Table, OrganizationAnalysis::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizationAnalysisDetail::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(OrganizationAnalysis::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrganizationAnalysis {
    Table,
    Id,
    OrganizationId,
    Description,
    AnalysisPerformedOn,
    TotalProcessedItems,
    CreatedOn,
}

#[derive(DeriveIden)]
enum OrganizationAnalysisDetail {
    Table,
    Id,
    AnalysisId,
    ItAssetName,
    ItServiceName,
    ProcessName,
    MacroprocessName,
    DepartmentName,
    SecurityThreatName,
    ItAssetRelevance,
    ItServiceRelevance,
    ProcessRelevance,
    SecurityThreatLevel,
    ItAssetVulnerabilityLevel,
    CalculatedImpact,
    CalculatedProbability,
    CalculatedRisk,
}

#[derive(DeriveIden)]
enum Organization { Table, Id }
