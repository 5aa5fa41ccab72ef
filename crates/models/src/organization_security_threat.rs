use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{organization, security_threat};

/// A catalog security threat rated in the context of one organization.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_security_threat")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub security_threat_id: i32,
    pub threat_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
    pub last_modified_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Organization,
    SecurityThreat,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Organization => Entity::belongs_to(organization::Entity)
                .from(Column::OrganizationId)
                .to(organization::Column::Id)
                .into(),
            Relation::SecurityThreat => Entity::belongs_to(security_threat::Entity)
                .from(Column::SecurityThreatId)
                .to(security_threat::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
