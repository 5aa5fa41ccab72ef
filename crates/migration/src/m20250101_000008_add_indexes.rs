use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One macroprocess instance per (organization, department, macroprocess).
        manager
            .create_index(
                Index::create()
                    .name("uniq_org_macroprocess")
                    .table(OrganizationMacroprocess::Table)
                    .col(OrganizationMacroprocess::OrganizationId)
                    .col(OrganizationMacroprocess::DepartmentId)
                    .col(OrganizationMacroprocess::MacroprocessId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One process instance per (macroprocess instance, process).
        manager
            .create_index(
                Index::create()
                    .name("uniq_org_process")
                    .table(OrganizationProcess::Table)
                    .col(OrganizationProcess::MacroprocessInstanceId)
                    .col(OrganizationProcess::ProcessId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One IT service instance per (process instance, IT service).
        manager
            .create_index(
                Index::create()
                    .name("uniq_org_it_service")
                    .table(OrganizationItService::Table)
                    .col(OrganizationItService::ProcessInstanceId)
                    .col(OrganizationItService::ItServiceId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One IT asset instance per (organization, IT asset).
        manager
            .create_index(
                Index::create()
                    .name("uniq_org_it_asset")
                    .table(OrganizationItAsset::Table)
                    .col(OrganizationItAsset::OrganizationId)
                    .col(OrganizationItAsset::ItAssetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // A security threat can be attached to an organization only once.
        manager
            .create_index(
                Index::create()
                    .name("uniq_org_security_threat")
                    .table(OrganizationSecurityThreat::Table)
                    .col(OrganizationSecurityThreat::OrganizationId)
                    .col(OrganizationSecurityThreat::SecurityThreatId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lookup indexes for organization-scoped listings.
        manager
            .create_index(
                Index::create()
                    .name("idx_org_process_org")
                    .table(OrganizationProcess::Table)
                    .col(OrganizationProcess::OrganizationId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_org_it_service_org")
                    .table(OrganizationItService::Table)
                    .col(OrganizationItService::OrganizationId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_org_it_asset_org")
                    .table(OrganizationItAsset::Table)
                    .col(OrganizationItAsset::OrganizationId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_org_vulnerability_asset")
                    .table(OrganizationItAssetVulnerability::Table)
                    .col(OrganizationItAssetVulnerability::ItAssetInstanceId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_org_analysis_org")
                    .table(OrganizationAnalysis::Table)
                    .col(OrganizationAnalysis::OrganizationId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_analysis_detail_analysis")
                    .table(OrganizationAnalysisDetail::Table)
                    .col(OrganizationAnalysisDetail::AnalysisId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_analysis_detail_analysis")
                    .table(OrganizationAnalysisDetail::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_org_analysis_org").table(OrganizationAnalysis::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_org_vulnerability_asset")
                    .table(OrganizationItAssetVulnerability::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_org_it_asset_org").table(OrganizationItAsset::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_org_it_service_org")
                    .table(OrganizationItService::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_org_process_org").table(OrganizationProcess::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uniq_org_security_threat")
                    .table(OrganizationSecurityThreat::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("uniq_org_it_asset").table(OrganizationItAsset::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("uniq_org_it_service").table(OrganizationItService::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("uniq_org_process").table(OrganizationProcess::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uniq_org_macroprocess")
                    .table(OrganizationMacroprocess::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum OrganizationMacroprocess { Table, OrganizationId, DepartmentId, MacroprocessId }

#[derive(DeriveIden)]
enum OrganizationProcess { Table, OrganizationId, MacroprocessInstanceId, ProcessId }

#[derive(DeriveIden)]
enum OrganizationItService { Table, OrganizationId, ProcessInstanceId, ItServiceId }

#[derive(DeriveIden)]
enum OrganizationItAsset { Table, OrganizationId, ItAssetId }

#[derive(DeriveIden)]
enum OrganizationSecurityThreat { Table, OrganizationId, SecurityThreatId }

#[derive(DeriveIden)]
enum OrganizationItAssetVulnerability { Table, ItAssetInstanceId }

#[derive(DeriveIden)]
enum OrganizationAnalysis { Table, OrganizationId }

#[derive(DeriveIden)]
enum OrganizationAnalysisDetail { Table, AnalysisId }
