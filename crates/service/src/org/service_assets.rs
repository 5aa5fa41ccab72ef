//! Links between IT service instances and IT asset instances. The rating on
//! the link says how relevant the asset is for that particular service.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};

use common::types::Paging;
use models::{
    it_asset, organization_it_asset, organization_it_service, organization_it_service_it_asset,
};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{check_rating_level, double_option, ensure_valid, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAssetRow {
    pub it_asset_instance_id: i32,
    pub it_asset_id: i32,
    pub it_asset_name: String,
    pub relevance_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachServiceAsset {
    pub it_asset_instance_id: Option<i32>,
    pub relevance_level_id: Option<i16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchServiceAsset {
    #[serde(default, deserialize_with = "double_option")]
    pub relevance_level_id: Option<Option<i16>>,
}

async fn require_service_instance(
    db: &DatabaseConnection,
    organization_id: i32,
    service_instance_id: i32,
) -> Result<organization_it_service::Model, ServiceError> {
    organizations::require(db, organization_id).await?;
    organization_it_service::Entity::find_by_id(service_instance_id)
        .one(db)
        .await
        .map_err(db_err)?
        .filter(|s| s.organization_id == organization_id)
        .ok_or_else(|| ServiceError::not_found("IT service instance"))
}

fn rows(service_instance_id: i32) -> Select<organization_it_service_it_asset::Entity> {
    organization_it_service_it_asset::Entity::find()
        .select_only()
        .column(organization_it_service_it_asset::Column::ItAssetInstanceId)
        .column(organization_it_asset::Column::ItAssetId)
        .column_as(it_asset::Column::Name, "it_asset_name")
        .column(organization_it_service_it_asset::Column::RelevanceLevelId)
        .column(organization_it_service_it_asset::Column::CreatedOn)
        .join(
            JoinType::InnerJoin,
            organization_it_service_it_asset::Relation::AssetInstance.def(),
        )
        .join(JoinType::InnerJoin, organization_it_asset::Relation::ItAsset.def())
        .filter(
            organization_it_service_it_asset::Column::ItServiceInstanceId.eq(service_instance_id),
        )
        .order_by_asc(it_asset::Column::Name)
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    service_instance_id: i32,
    params: PageParams,
) -> Result<(Vec<ServiceAssetRow>, Paging), ServiceError> {
    require_service_instance(db, organization_id, service_instance_id).await?;
    pagination::page(db, rows(service_instance_id).into_model::<ServiceAssetRow>(), params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    service_instance_id: i32,
    asset_instance_id: i32,
) -> Result<Option<ServiceAssetRow>, ServiceError> {
    require_service_instance(db, organization_id, service_instance_id).await?;
    rows(service_instance_id)
        .filter(organization_it_service_it_asset::Column::ItAssetInstanceId.eq(asset_instance_id))
        .into_model::<ServiceAssetRow>()
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    service_instance_id: i32,
    input: AttachServiceAsset,
) -> Result<ServiceAssetRow, ServiceError> {
    require_service_instance(db, organization_id, service_instance_id).await?;

    let mut errors = Vec::new();
    let asset_instance_id = input.it_asset_instance_id.unwrap_or_default();
    if input.it_asset_instance_id.is_none() {
        errors.push(FieldError::cannot_be_null("itAssetInstanceId"));
    } else {
        let asset = organization_it_asset::Entity::find_by_id(asset_instance_id)
            .one(db)
            .await
            .map_err(db_err)?;
        if !matches!(asset, Some(a) if a.organization_id == organization_id) {
            errors.push(FieldError::invalid_value("itAssetInstanceId"));
        } else if organization_it_service_it_asset::Entity::find_by_id((
            service_instance_id,
            asset_instance_id,
        ))
        .one(db)
        .await
        .map_err(db_err)?
        .is_some()
        {
            errors.push(FieldError::already_exists("itAssetInstanceId"));
        }
    }
    check_rating_level(db, "relevanceLevelId", input.relevance_level_id, &mut errors).await?;
    ensure_valid(errors)?;

    organization_it_service_it_asset::ActiveModel {
        it_service_instance_id: Set(service_instance_id),
        it_asset_instance_id: Set(asset_instance_id),
        relevance_level_id: Set(input.relevance_level_id),
        created_on: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    get(db, organization_id, service_instance_id, asset_instance_id)
        .await?
        .ok_or_else(|| ServiceError::Internal("linked asset row missing".into()))
}

pub async fn patch(
    db: &DatabaseConnection,
    organization_id: i32,
    service_instance_id: i32,
    asset_instance_id: i32,
    input: PatchServiceAsset,
) -> Result<ServiceAssetRow, ServiceError> {
    require_service_instance(db, organization_id, service_instance_id).await?;
    let current = organization_it_service_it_asset::Entity::find_by_id((
        service_instance_id,
        asset_instance_id,
    ))
    .one(db)
    .await
    .map_err(db_err)?
    .ok_or_else(|| ServiceError::not_found("linked IT asset"))?;

    let Some(relevance) = input.relevance_level_id else {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    };

    let mut errors = Vec::new();
    check_rating_level(db, "relevanceLevelId", relevance, &mut errors).await?;
    ensure_valid(errors)?;

    if relevance != current.relevance_level_id {
        let mut am: organization_it_service_it_asset::ActiveModel = current.into();
        am.relevance_level_id = Set(relevance);
        am.update(db).await.map_err(db_err)?;
    }

    get(db, organization_id, service_instance_id, asset_instance_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("linked IT asset"))
}

pub async fn delete(
    db: &DatabaseConnection,
    organization_id: i32,
    service_instance_id: i32,
    asset_instance_id: i32,
) -> Result<bool, ServiceError> {
    require_service_instance(db, organization_id, service_instance_id).await?;
    let res = organization_it_service_it_asset::Entity::delete_by_id((
        service_instance_id,
        asset_instance_id,
    ))
    .exec(db)
    .await
    .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
