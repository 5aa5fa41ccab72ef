use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{it_service, organization_process};

/// An IT service supporting a process instance, with its relevance rating.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_it_service")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub process_instance_id: i32,
    pub it_service_id: i32,
    pub relevance_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ProcessInstance,
    ItService,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ProcessInstance => Entity::belongs_to(organization_process::Entity)
                .from(Column::ProcessInstanceId)
                .to(organization_process::Column::Id)
                .into(),
            Relation::ItService => Entity::belongs_to(it_service::Entity)
                .from(Column::ItServiceId)
                .to(it_service::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
