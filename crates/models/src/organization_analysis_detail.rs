use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::organization_analysis;

/// One rated combination captured by an analysis run.
///
/// Names and levels are denormalized on purpose: a detail row must keep
/// reporting what was true when the analysis ran, regardless of later edits
/// to catalogs or ratings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_analysis_detail")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub analysis_id: i32,
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
    pub calculated_impact: f64,
    pub calculated_probability: f64,
    pub calculated_risk: f64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Analysis,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Analysis => Entity::belongs_to(organization_analysis::Entity)
                .from(Column::AnalysisId)
                .to(organization_analysis::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
