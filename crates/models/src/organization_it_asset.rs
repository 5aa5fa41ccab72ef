use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{it_asset, organization};

/// An IT asset owned by an organization, with its relevance rating.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_it_asset")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub it_asset_id: i32,
    pub relevance_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Organization,
    ItAsset,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Organization => Entity::belongs_to(organization::Entity)
                .from(Column::OrganizationId)
                .to(organization::Column::Id)
                .into(),
            Relation::ItAsset => Entity::belongs_to(it_asset::Entity)
                .from(Column::ItAssetId)
                .to(it_asset::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
