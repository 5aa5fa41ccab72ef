use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{department, macroprocess, organization_department};

/// A macroprocess instantiated under a department of an organization.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_macroprocess")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub department_id: i32,
    pub macroprocess_id: i32,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    DepartmentInstance,
    Department,
    Macroprocess,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::DepartmentInstance => Entity::belongs_to(organization_department::Entity)
                .from((Column::OrganizationId, Column::DepartmentId))
                .to((
                    organization_department::Column::OrganizationId,
                    organization_department::Column::DepartmentId,
                ))
                .into(),
            Relation::Department => Entity::belongs_to(department::Entity)
                .from(Column::DepartmentId)
                .to(department::Column::Id)
                .into(),
            Relation::Macroprocess => Entity::belongs_to(macroprocess::Entity)
                .from(Column::MacroprocessId)
                .to(macroprocess::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
