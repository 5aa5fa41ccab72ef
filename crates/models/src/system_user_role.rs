use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{system_role, system_user};

/// Grant of a role to a system user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_user_role")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub role_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Role,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(system_user::Entity)
                .from(Column::UserId)
                .to(system_user::Column::Id)
                .into(),
            Relation::Role => Entity::belongs_to(system_role::Entity)
                .from(Column::RoleId)
                .to(system_role::Column::Id)
                .into(),
        }
    }
}

impl Related<system_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
