//! IT assets owned by an organization.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};

use common::types::Paging;
use models::{it_asset, organization_it_asset};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{check_rating_level, double_option, ensure_valid, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct OrgItAssetRow {
    pub id: i32,
    pub it_asset_id: i32,
    pub it_asset_name: String,
    pub relevance_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachItAsset {
    pub it_asset_id: Option<i32>,
    pub relevance_level_id: Option<i16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOrgItAsset {
    #[serde(default, deserialize_with = "double_option")]
    pub relevance_level_id: Option<Option<i16>>,
}

fn rows(organization_id: i32) -> Select<organization_it_asset::Entity> {
    organization_it_asset::Entity::find()
        .select_only()
        .column(organization_it_asset::Column::Id)
        .column(organization_it_asset::Column::ItAssetId)
        .column_as(it_asset::Column::Name, "it_asset_name")
        .column(organization_it_asset::Column::RelevanceLevelId)
        .column(organization_it_asset::Column::CreatedOn)
        .join(JoinType::InnerJoin, organization_it_asset::Relation::ItAsset.def())
        .filter(organization_it_asset::Column::OrganizationId.eq(organization_id))
        .order_by_asc(it_asset::Column::Name)
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    params: PageParams,
) -> Result<(Vec<OrgItAssetRow>, Paging), ServiceError> {
    organizations::require(db, organization_id).await?;
    pagination::page(db, rows(organization_id).into_model::<OrgItAssetRow>(), params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
) -> Result<Option<OrgItAssetRow>, ServiceError> {
    organizations::require(db, organization_id).await?;
    rows(organization_id)
        .filter(organization_it_asset::Column::Id.eq(instance_id))
        .into_model::<OrgItAssetRow>()
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    input: AttachItAsset,
) -> Result<OrgItAssetRow, ServiceError> {
    organizations::require(db, organization_id).await?;

    let mut errors = Vec::new();
    let it_asset_id = input.it_asset_id.unwrap_or_default();
    if input.it_asset_id.is_none() {
        errors.push(FieldError::cannot_be_null("itAssetId"));
    } else if it_asset::Entity::find_by_id(it_asset_id)
        .one(db)
        .await
        .map_err(db_err)?
        .is_none()
    {
        errors.push(FieldError::invalid_value("itAssetId"));
    } else {
        let duplicate = organization_it_asset::Entity::find()
            .filter(organization_it_asset::Column::OrganizationId.eq(organization_id))
            .filter(organization_it_asset::Column::ItAssetId.eq(it_asset_id))
            .one(db)
            .await
            .map_err(db_err)?;
        if duplicate.is_some() {
            errors.push(FieldError::already_exists("itAssetId"));
        }
    }
    check_rating_level(db, "relevanceLevelId", input.relevance_level_id, &mut errors).await?;
    ensure_valid(errors)?;

    let inserted = organization_it_asset::ActiveModel {
        organization_id: Set(organization_id),
        it_asset_id: Set(it_asset_id),
        relevance_level_id: Set(input.relevance_level_id),
        created_on: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    get(db, organization_id, inserted.id)
        .await?
        .ok_or_else(|| ServiceError::Internal("attached IT asset row missing".into()))
}

pub async fn patch(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
    input: PatchOrgItAsset,
) -> Result<OrgItAssetRow, ServiceError> {
    organizations::require(db, organization_id).await?;
    let current = organization_it_asset::Entity::find_by_id(instance_id)
        .one(db)
        .await
        .map_err(db_err)?
        .filter(|a| a.organization_id == organization_id)
        .ok_or_else(|| ServiceError::not_found("IT asset instance"))?;

    let Some(relevance) = input.relevance_level_id else {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    };

    let mut errors = Vec::new();
    check_rating_level(db, "relevanceLevelId", relevance, &mut errors).await?;
    ensure_valid(errors)?;

    if relevance != current.relevance_level_id {
        let mut am: organization_it_asset::ActiveModel = current.into();
        am.relevance_level_id = Set(relevance);
        am.update(db).await.map_err(db_err)?;
    }

    get(db, organization_id, instance_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("IT asset instance"))
}

/// Remove an asset instance. Vulnerabilities recorded against it and links to
/// service instances are cascaded away.
pub async fn delete(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
) -> Result<bool, ServiceError> {
    organizations::require(db, organization_id).await?;
    let res = organization_it_asset::Entity::delete_many()
        .filter(organization_it_asset::Column::Id.eq(instance_id))
        .filter(organization_it_asset::Column::OrganizationId.eq(organization_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
