//! Vulnerabilities recorded against an organization's IT asset instances.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use common::constants::GENERAL_DESCRIPTION_MAX_LENGTH;
use common::types::Paging;
use models::{organization_it_asset, organization_it_asset_vulnerability as vulnerability};

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{
    check_rating_level, double_option, ensure_valid, validate_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVulnerability {
    pub description: Option<String>,
    pub vulnerability_level_id: Option<i16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchVulnerability {
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vulnerability_level_id: Option<Option<i16>>,
}

impl PatchVulnerability {
    fn is_empty(&self) -> bool {
        self.description.is_none() && self.vulnerability_level_id.is_none()
    }
}

async fn require_asset_instance(
    db: &DatabaseConnection,
    organization_id: i32,
    asset_instance_id: i32,
) -> Result<organization_it_asset::Model, ServiceError> {
    organizations::require(db, organization_id).await?;
    organization_it_asset::Entity::find_by_id(asset_instance_id)
        .one(db)
        .await
        .map_err(db_err)?
        .filter(|a| a.organization_id == organization_id)
        .ok_or_else(|| ServiceError::not_found("IT asset instance"))
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    asset_instance_id: i32,
    params: PageParams,
) -> Result<(Vec<vulnerability::Model>, Paging), ServiceError> {
    require_asset_instance(db, organization_id, asset_instance_id).await?;
    let query = vulnerability::Entity::find()
        .filter(vulnerability::Column::ItAssetInstanceId.eq(asset_instance_id))
        .order_by_asc(vulnerability::Column::Id);
    pagination::page(db, query, params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    asset_instance_id: i32,
    vulnerability_id: i32,
) -> Result<Option<vulnerability::Model>, ServiceError> {
    require_asset_instance(db, organization_id, asset_instance_id).await?;
    Ok(vulnerability::Entity::find_by_id(vulnerability_id)
        .one(db)
        .await
        .map_err(db_err)?
        .filter(|v| v.it_asset_instance_id == asset_instance_id))
}

pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    asset_instance_id: i32,
    input: CreateVulnerability,
) -> Result<vulnerability::Model, ServiceError> {
    require_asset_instance(db, organization_id, asset_instance_id).await?;

    let mut errors = Vec::new();
    let description = validate_str(
        "description",
        input.description.as_deref(),
        StrRules::max(GENERAL_DESCRIPTION_MAX_LENGTH),
        &mut errors,
    );
    check_rating_level(db, "vulnerabilityLevelId", input.vulnerability_level_id, &mut errors)
        .await?;
    ensure_valid(errors)?;

    let now = Utc::now();
    vulnerability::ActiveModel {
        it_asset_instance_id: Set(asset_instance_id),
        description: Set(description),
        vulnerability_level_id: Set(input.vulnerability_level_id),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)
}

pub async fn patch(
    db: &DatabaseConnection,
    organization_id: i32,
    asset_instance_id: i32,
    vulnerability_id: i32,
    input: PatchVulnerability,
) -> Result<vulnerability::Model, ServiceError> {
    let current = get(db, organization_id, asset_instance_id, vulnerability_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("vulnerability"))?;

    if input.is_empty() {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    }

    let mut errors = Vec::new();
    let mut new_description = None;
    if let Some(value) = &input.description {
        new_description = Some(validate_str(
            "description",
            value.as_deref(),
            StrRules::max(GENERAL_DESCRIPTION_MAX_LENGTH),
            &mut errors,
        ));
    }
    if let Some(level) = input.vulnerability_level_id {
        check_rating_level(db, "vulnerabilityLevelId", level, &mut errors).await?;
    }
    ensure_valid(errors)?;

    let mut am: vulnerability::ActiveModel = current.clone().into();
    let mut changed = false;
    if let Some(description) = new_description {
        if description != current.description {
            am.description = Set(description);
            changed = true;
        }
    }
    if let Some(level) = input.vulnerability_level_id {
        if level != current.vulnerability_level_id {
            am.vulnerability_level_id = Set(level);
            changed = true;
        }
    }
    if !changed {
        return Ok(current);
    }
    am.last_modified_on = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

pub async fn delete(
    db: &DatabaseConnection,
    organization_id: i32,
    asset_instance_id: i32,
    vulnerability_id: i32,
) -> Result<bool, ServiceError> {
    require_asset_instance(db, organization_id, asset_instance_id).await?;
    let res = vulnerability::Entity::delete_many()
        .filter(vulnerability::Column::Id.eq(vulnerability_id))
        .filter(vulnerability::Column::ItAssetInstanceId.eq(asset_instance_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
