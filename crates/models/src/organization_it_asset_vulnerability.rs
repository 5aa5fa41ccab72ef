use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::organization_it_asset;

/// A vulnerability recorded against an IT asset instance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_it_asset_vulnerability")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub it_asset_instance_id: i32,
    pub description: Option<String>,
    pub vulnerability_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
    pub last_modified_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    AssetInstance,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::AssetInstance => Entity::belongs_to(organization_it_asset::Entity)
                .from(Column::ItAssetInstanceId)
                .to(organization_it_asset::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
