//! Risk analysis runs.
//!
//! An analysis walks every fully rated combination of department,
//! macroprocess, process, IT service, IT asset, vulnerability and threat
//! inside one organization, scores it, and snapshots the result as detail
//! rows. Combinations with any unrated link are left out of the run.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::info;

use common::constants::GENERAL_DESCRIPTION_MAX_LENGTH;
use common::types::Paging;
use models::{
    department, it_asset, it_service, macroprocess, organization_analysis,
    organization_analysis_detail, organization_it_asset, organization_it_asset_vulnerability,
    organization_it_service, organization_it_service_it_asset, organization_macroprocess,
    organization_process, organization_security_threat, process, security_threat,
};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{
    double_option, ensure_valid, validate_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnalysis {
    pub description: Option<String>,
    pub analysis_performed_on: Option<DateTimeWithTimeZone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchAnalysis {
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// One fully rated combination pulled from the organization structure.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct RatedCombination {
    pub it_asset_name: String,
    pub it_service_name: String,
    pub process_name: String,
    pub macroprocess_name: String,
    pub department_name: String,
    pub security_threat_name: String,
    pub it_asset_relevance: i16,
    pub it_service_relevance: i16,
    pub process_relevance: i16,
    pub security_threat_level: i16,
    pub it_asset_vulnerability_level: i16,
}

/// Scores derived from one combination. All three are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskScore {
    pub impact: f64,
    pub probability: f64,
    pub risk: f64,
}

/// Impact comes from the relevance chain, probability from vulnerability and
/// threat, each level scaled to level/5. Risk is their product.
pub fn compute_risk(
    it_asset_relevance: i16,
    it_service_relevance: i16,
    process_relevance: i16,
    vulnerability_level: i16,
    threat_level: i16,
) -> RiskScore {
    let scale = |level: i16| f64::from(level) / 5.0;
    let impact = scale(it_asset_relevance) * scale(it_service_relevance) * scale(process_relevance);
    let probability = scale(vulnerability_level) * scale(threat_level);
    RiskScore {
        impact,
        probability,
        risk: impact * probability,
    }
}

/// Cross product of the organization's service-asset links with its rated
/// threats and the vulnerabilities of the linked asset. `> 0` on each level
/// keeps unrated rows (null levels) out of the run.
fn rated_combinations_query(
    organization_id: i32,
) -> Select<organization_it_service_it_asset::Entity> {
    use organization_it_service_it_asset as link;

    link::Entity::find()
        .select_only()
        .column_as(it_asset::Column::Name, "it_asset_name")
        .column_as(it_service::Column::Name, "it_service_name")
        .column_as(process::Column::Name, "process_name")
        .column_as(macroprocess::Column::Name, "macroprocess_name")
        .column_as(department::Column::Name, "department_name")
        .column_as(security_threat::Column::Name, "security_threat_name")
        .column_as(link::Column::RelevanceLevelId, "it_asset_relevance")
        .column_as(
            organization_it_service::Column::RelevanceLevelId,
            "it_service_relevance",
        )
        .column_as(organization_process::Column::RelevanceLevelId, "process_relevance")
        .column_as(
            organization_security_threat::Column::ThreatLevelId,
            "security_threat_level",
        )
        .column_as(
            organization_it_asset_vulnerability::Column::VulnerabilityLevelId,
            "it_asset_vulnerability_level",
        )
        .join(JoinType::InnerJoin, link::Relation::ServiceInstance.def())
        .join(
            JoinType::InnerJoin,
            organization_it_service::Relation::ProcessInstance.def(),
        )
        .join(
            JoinType::InnerJoin,
            organization_process::Relation::MacroprocessInstance.def(),
        )
        .join(JoinType::InnerJoin, link::Relation::AssetInstance.def())
        .join(
            JoinType::InnerJoin,
            organization_it_asset::Relation::Organization.def(),
        )
        .join(
            JoinType::InnerJoin,
            organization_security_threat::Relation::Organization.def().rev(),
        )
        .join(
            JoinType::InnerJoin,
            organization_it_asset_vulnerability::Relation::AssetInstance.def().rev(),
        )
        .join(
            JoinType::InnerJoin,
            organization_macroprocess::Relation::Department.def(),
        )
        .join(
            JoinType::InnerJoin,
            organization_macroprocess::Relation::Macroprocess.def(),
        )
        .join(JoinType::InnerJoin, organization_process::Relation::Process.def())
        .join(
            JoinType::InnerJoin,
            organization_it_service::Relation::ItService.def(),
        )
        .join(JoinType::InnerJoin, organization_it_asset::Relation::ItAsset.def())
        .join(
            JoinType::InnerJoin,
            organization_security_threat::Relation::SecurityThreat.def(),
        )
        .filter(models::organization::Column::Id.eq(organization_id))
        .filter(link::Column::RelevanceLevelId.gt(0))
        .filter(organization_it_service::Column::RelevanceLevelId.gt(0))
        .filter(organization_process::Column::RelevanceLevelId.gt(0))
        .filter(organization_security_threat::Column::ThreatLevelId.gt(0))
        .filter(organization_it_asset_vulnerability::Column::VulnerabilityLevelId.gt(0))
}

fn detail_rows(
    analysis_id: i32,
    combinations: Vec<RatedCombination>,
) -> Vec<organization_analysis_detail::ActiveModel> {
    combinations
        .into_iter()
        .map(|c| {
            let score = compute_risk(
                c.it_asset_relevance,
                c.it_service_relevance,
                c.process_relevance,
                c.it_asset_vulnerability_level,
                c.security_threat_level,
            );
            organization_analysis_detail::ActiveModel {
                analysis_id: Set(analysis_id),
                it_asset_name: Set(c.it_asset_name),
                it_service_name: Set(c.it_service_name),
                process_name: Set(c.process_name),
                macroprocess_name: Set(c.macroprocess_name),
                department_name: Set(c.department_name),
                security_threat_name: Set(c.security_threat_name),
                it_asset_relevance: Set(c.it_asset_relevance),
                it_service_relevance: Set(c.it_service_relevance),
                process_relevance: Set(c.process_relevance),
                security_threat_level: Set(c.security_threat_level),
                it_asset_vulnerability_level: Set(c.it_asset_vulnerability_level),
                calculated_impact: Set(score.impact),
                calculated_probability: Set(score.probability),
                calculated_risk: Set(score.risk),
                ..Default::default()
            }
        })
        .collect()
}

/// Run a new analysis: collect rated combinations, score them, and store the
/// run with its detail snapshot in one transaction.
pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    input: CreateAnalysis,
) -> Result<organization_analysis::Model, ServiceError> {
    organizations::require(db, organization_id).await?;

    let mut errors = Vec::new();
    let description = validate_str(
        "description",
        input.description.as_deref(),
        StrRules::max(GENERAL_DESCRIPTION_MAX_LENGTH),
        &mut errors,
    );
    if let Some(ts) = input.analysis_performed_on {
        if ts > Utc::now() {
            errors.push(FieldError::invalid_value("analysisPerformedOn"));
        }
    }
    ensure_valid(errors)?;

    let combinations = rated_combinations_query(organization_id)
        .into_model::<RatedCombination>()
        .all(db)
        .await
        .map_err(db_err)?;

    let now = Utc::now();
    let performed_on = input.analysis_performed_on.unwrap_or_else(|| now.into());

    let txn = db.begin().await.map_err(db_err)?;
    let analysis = organization_analysis::ActiveModel {
        organization_id: Set(organization_id),
        description: Set(description),
        analysis_performed_on: Set(Some(performed_on)),
        total_processed_items: Set(combinations.len() as i32),
        created_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(db_err)?;

    if !combinations.is_empty() {
        organization_analysis_detail::Entity::insert_many(detail_rows(analysis.id, combinations))
            .exec(&txn)
            .await
            .map_err(db_err)?;
    }
    txn.commit().await.map_err(db_err)?;

    info!(
        analysis_id = analysis.id,
        organization_id,
        total_processed_items = analysis.total_processed_items,
        "risk analysis stored"
    );
    Ok(analysis)
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    params: PageParams,
) -> Result<(Vec<organization_analysis::Model>, Paging), ServiceError> {
    organizations::require(db, organization_id).await?;
    let query = organization_analysis::Entity::find()
        .filter(organization_analysis::Column::OrganizationId.eq(organization_id))
        .order_by_desc(organization_analysis::Column::CreatedOn);
    pagination::page(db, query, params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    analysis_id: i32,
) -> Result<Option<organization_analysis::Model>, ServiceError> {
    organizations::require(db, organization_id).await?;
    Ok(organization_analysis::Entity::find_by_id(analysis_id)
        .one(db)
        .await
        .map_err(db_err)?
        .filter(|a| a.organization_id == organization_id))
}

/// Only the description of a stored run may change. Detail rows and the
/// computed totals are immutable.
pub async fn patch(
    db: &DatabaseConnection,
    organization_id: i32,
    analysis_id: i32,
    input: PatchAnalysis,
) -> Result<organization_analysis::Model, ServiceError> {
    let current = get(db, organization_id, analysis_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("analysis"))?;

    let Some(value) = input.description else {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    };

    let mut errors = Vec::new();
    let description = validate_str(
        "description",
        value.as_deref(),
        StrRules::max(GENERAL_DESCRIPTION_MAX_LENGTH),
        &mut errors,
    );
    ensure_valid(errors)?;

    if description == current.description {
        return Ok(current);
    }
    let mut am: organization_analysis::ActiveModel = current.into();
    am.description = Set(description);
    am.update(db).await.map_err(db_err)
}

pub async fn list_details(
    db: &DatabaseConnection,
    organization_id: i32,
    analysis_id: i32,
    params: PageParams,
) -> Result<(Vec<organization_analysis_detail::Model>, Paging), ServiceError> {
    let analysis = get(db, organization_id, analysis_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("analysis"))?;
    let query = organization_analysis_detail::Entity::find()
        .filter(organization_analysis_detail::Column::AnalysisId.eq(analysis.id))
        .order_by_asc(organization_analysis_detail::Column::Id);
    pagination::page(db, query, params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::validation::ErrorCode;
    use crate::{catalog, org};
    use sea_orm::{DbBackend, QueryTrait};
    use uuid::Uuid;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn risk_of_fully_rated_chain_is_product_of_scaled_levels() {
        let all_max = compute_risk(5, 5, 5, 5, 5);
        assert!(close(all_max.impact, 1.0));
        assert!(close(all_max.probability, 1.0));
        assert!(close(all_max.risk, 1.0));

        let low_asset = compute_risk(1, 5, 5, 1, 5);
        assert!(close(low_asset.impact, 0.2));
        assert!(close(low_asset.probability, 0.2));
        assert!(close(low_asset.risk, 0.04));

        let mixed = compute_risk(3, 4, 5, 2, 1);
        assert!(close(mixed.impact, 0.48));
        assert!(close(mixed.probability, 0.08));
        assert!(close(mixed.risk, 0.0384));
    }

    #[test]
    fn detail_rows_snapshot_names_levels_and_scores() {
        let combo = RatedCombination {
            it_asset_name: "File server".into(),
            it_service_name: "Storage".into(),
            process_name: "Payroll".into(),
            macroprocess_name: "HR".into(),
            department_name: "Operations".into(),
            security_threat_name: "Ransomware".into(),
            it_asset_relevance: 5,
            it_service_relevance: 4,
            process_relevance: 3,
            security_threat_level: 2,
            it_asset_vulnerability_level: 1,
        };
        let rows = detail_rows(9, vec![combo]);
        assert_eq!(rows.len(), 1);
        let row = rows.into_iter().next().unwrap();
        assert_eq!(row.analysis_id.clone().unwrap(), 9);
        assert_eq!(row.department_name.clone().unwrap(), "Operations");
        assert_eq!(row.security_threat_name.clone().unwrap(), "Ransomware");
        assert_eq!(row.it_asset_relevance.clone().unwrap(), 5);
        assert!(close(row.calculated_impact.clone().unwrap(), 0.48));
        assert!(close(row.calculated_probability.clone().unwrap(), 0.08));
        assert!(close(row.calculated_risk.clone().unwrap(), 0.0384));
    }

    #[test]
    fn combination_query_scopes_and_excludes_unrated() {
        let sql = rated_combinations_query(42)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""organization"."id" = 42"#), "{sql}");
        assert!(sql.contains(r#"INNER JOIN "organization_security_threat""#), "{sql}");
        assert!(
            sql.contains(r#"INNER JOIN "organization_it_asset_vulnerability""#),
            "{sql}"
        );
        assert!(sql.contains(r#"AS "security_threat_name""#), "{sql}");
        assert!(sql.contains(r#"AS "it_asset_vulnerability_level""#), "{sql}");
        // One null-excluding filter per rating.
        assert_eq!(sql.matches("> 0").count(), 5, "{sql}");
    }

    fn unique(prefix: &str) -> String {
        format!("{prefix}_{}", Uuid::new_v4())
    }

    #[tokio::test]
    async fn analysis_runs_score_only_fully_rated_combinations() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        // Catalog fixtures.
        let dept = catalog::departments::create(
            &db,
            catalog::departments::CreateDepartment { name: Some(unique("dept")) },
        )
        .await?;
        let mp = catalog::macroprocesses::create(
            &db,
            catalog::macroprocesses::CreateMacroprocess { name: Some(unique("mp")) },
        )
        .await?;
        let proc = catalog::processes::create(
            &db,
            catalog::processes::CreateProcess { name: Some(unique("proc")) },
        )
        .await?;
        let svc = catalog::it_services::create(
            &db,
            catalog::it_services::CreateItService { name: Some(unique("svc")) },
        )
        .await?;
        let category = catalog::it_asset_categories::create(
            &db,
            catalog::it_asset_categories::CreateItAssetCategory {
                id: Some((Uuid::new_v4().as_u128() % 1_000_000) as i32 + 1_000),
                name: Some(unique("cat")),
            },
        )
        .await?;
        let asset = catalog::it_assets::create(
            &db,
            catalog::it_assets::CreateItAsset {
                name: Some(unique("asset")),
                category_id: Some(category.id),
                description: None,
            },
        )
        .await?;
        let threat = catalog::security_threats::create(
            &db,
            catalog::security_threats::CreateSecurityThreat {
                name: Some(unique("threat")),
                description: None,
            },
        )
        .await?;

        // Organization with one fully rated chain.
        let orga = crate::organizations::create(
            &db,
            crate::organizations::CreateOrganization {
                tax_id: Some(Uuid::new_v4().simple().to_string()[..16].to_string()),
                legal_name: Some(unique("org")),
                trade_name: None,
            },
        )
        .await?;
        org::departments::create(
            &db,
            orga.id,
            org::departments::AttachDepartment { department_id: Some(dept.id) },
        )
        .await?;
        let mp_inst = org::macroprocesses::create(
            &db,
            orga.id,
            org::macroprocesses::AttachMacroprocess {
                department_id: Some(dept.id),
                macroprocess_id: Some(mp.id),
            },
        )
        .await?;
        let proc_inst = org::processes::create(
            &db,
            orga.id,
            org::processes::AttachProcess {
                macroprocess_instance_id: Some(mp_inst.id),
                process_id: Some(proc.id),
                relevance_level_id: Some(5),
            },
        )
        .await?;
        let svc_inst = org::it_services::create(
            &db,
            orga.id,
            org::it_services::AttachItService {
                process_instance_id: Some(proc_inst.id),
                it_service_id: Some(svc.id),
                relevance_level_id: Some(5),
            },
        )
        .await?;
        let asset_inst = org::it_assets::create(
            &db,
            orga.id,
            org::it_assets::AttachItAsset {
                it_asset_id: Some(asset.id),
                relevance_level_id: Some(5),
            },
        )
        .await?;
        org::service_assets::create(
            &db,
            orga.id,
            svc_inst.id,
            org::service_assets::AttachServiceAsset {
                it_asset_instance_id: Some(asset_inst.id),
                relevance_level_id: Some(5),
            },
        )
        .await?;
        org::security_threats::create(
            &db,
            orga.id,
            org::security_threats::AttachSecurityThreat {
                security_threat_id: Some(threat.id),
                threat_level_id: Some(5),
            },
        )
        .await?;
        org::vulnerabilities::create(
            &db,
            orga.id,
            asset_inst.id,
            org::vulnerabilities::CreateVulnerability {
                description: Some("weak backups".into()),
                vulnerability_level_id: Some(5),
            },
        )
        .await?;

        let run = create(
            &db,
            orga.id,
            CreateAnalysis { description: Some("baseline".into()), analysis_performed_on: None },
        )
        .await?;
        assert_eq!(run.total_processed_items, 1);
        assert_eq!(run.description.as_deref(), Some("baseline"));

        let (details, paging) =
            list_details(&db, orga.id, run.id, PageParams::default()).await?;
        assert_eq!(paging.total_records, 1);
        assert_eq!(details.len(), 1);
        let detail = &details[0];
        assert_eq!(detail.department_name, dept.name);
        assert_eq!(detail.it_asset_name, asset.name);
        assert!(close(detail.calculated_risk, 1.0));

        // An unrated vulnerability must not add combinations.
        org::vulnerabilities::create(
            &db,
            orga.id,
            asset_inst.id,
            org::vulnerabilities::CreateVulnerability {
                description: Some("unrated finding".into()),
                vulnerability_level_id: None,
            },
        )
        .await?;
        let second = create(&db, orga.id, CreateAnalysis::default()).await?;
        assert_eq!(second.total_processed_items, 1);

        // Rating ids outside the seeded levels are rejected.
        let bad_rating = org::processes::patch(
            &db,
            orga.id,
            proc_inst.id,
            org::processes::PatchOrgProcess { relevance_level_id: Some(Some(9)) },
        )
        .await;
        match bad_rating {
            Err(ServiceError::Unprocessable(errors)) => {
                assert_eq!(errors[0].code, ErrorCode::FieldValueInvalid);
                assert_eq!(errors[0].field_name.as_deref(), Some("relevanceLevelId"));
            }
            other => panic!("expected rating rejection, got {:?}", other.map(|r| r.id)),
        }

        // A future timestamp never reaches storage.
        let future = create(
            &db,
            orga.id,
            CreateAnalysis {
                description: None,
                analysis_performed_on: Some((Utc::now() + chrono::Duration::days(1)).into()),
            },
        )
        .await;
        match future {
            Err(ServiceError::Unprocessable(errors)) => {
                assert_eq!(errors[0].code, ErrorCode::FieldValueInvalid);
                assert_eq!(errors[0].field_name.as_deref(), Some("analysisPerformedOn"));
            }
            other => panic!("expected future-date rejection, got {:?}", other.map(|r| r.id)),
        }

        let renamed = patch(
            &db,
            orga.id,
            run.id,
            PatchAnalysis { description: Some(Some("reviewed baseline".into())) },
        )
        .await?;
        assert_eq!(renamed.description.as_deref(), Some("reviewed baseline"));

        let empty = patch(&db, orga.id, run.id, PatchAnalysis::default()).await;
        assert!(matches!(empty, Err(ServiceError::Unprocessable(_))));

        // Runs are scoped to their organization.
        let other_org = crate::organizations::create(
            &db,
            crate::organizations::CreateOrganization {
                tax_id: Some(Uuid::new_v4().simple().to_string()[..16].to_string()),
                legal_name: Some(unique("org")),
                trade_name: None,
            },
        )
        .await?;
        assert!(get(&db, other_org.id, run.id).await?.is_none());
        let empty_run = create(&db, other_org.id, CreateAnalysis::default()).await?;
        assert_eq!(empty_run.total_processed_items, 0);

        // Cleanup: cascades take the nested rows, catalogs are freed after.
        crate::organizations::delete(&db, orga.id).await?;
        crate::organizations::delete(&db, other_org.id).await?;
        catalog::it_assets::delete(&db, asset.id).await?;
        catalog::it_asset_categories::delete(&db, category.id).await?;
        catalog::security_threats::delete(&db, threat.id).await?;
        catalog::it_services::delete(&db, svc.id).await?;
        catalog::processes::delete(&db, proc.id).await?;
        catalog::macroprocesses::delete(&db, mp.id).await?;
        catalog::departments::delete(&db, dept.id).await?;
        Ok(())
    }
}
