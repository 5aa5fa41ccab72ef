use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{organization_macroprocess, process};

/// A process instantiated under a macroprocess instance, carrying the
/// process relevance rating. A null rating means "not rated yet".
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_process")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub macroprocess_instance_id: i32,
    pub process_id: i32,
    pub relevance_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    MacroprocessInstance,
    Process,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::MacroprocessInstance => Entity::belongs_to(organization_macroprocess::Entity)
                .from(Column::MacroprocessInstanceId)
                .to(organization_macroprocess::Column::Id)
                .into(),
            Relation::Process => Entity::belongs_to(process::Entity)
                .from(Column::ProcessId)
                .to(process::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
