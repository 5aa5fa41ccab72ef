use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{organization_it_asset, organization_it_service};

/// Link between an IT service instance and an IT asset instance.
/// Carries the asset relevance for that service; the pair is the key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_it_service_it_asset")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub it_service_instance_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub it_asset_instance_id: i32,
    pub relevance_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ServiceInstance,
    AssetInstance,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceInstance => Entity::belongs_to(organization_it_service::Entity)
                .from(Column::ItServiceInstanceId)
                .to(organization_it_service::Column::Id)
                .into(),
            Relation::AssetInstance => Entity::belongs_to(organization_it_asset::Entity)
                .from(Column::ItAssetInstanceId)
                .to(organization_it_asset::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
