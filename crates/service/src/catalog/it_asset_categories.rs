//! IT asset category catalog. Category ids are chosen by the client so they
//! stay stable across deployments.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use common::constants::GENERAL_NAME_MAX_LENGTH;
use common::types::Paging;
use models::it_asset_category;

use crate::errors::{db_err, ServiceError};
use crate::pagination::{self, PageParams};
use crate::validation::{
    double_option, ensure_valid, validate_required_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItAssetCategory {
    pub id: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchItAssetCategory {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
}

pub async fn list(
    db: &DatabaseConnection,
    params: PageParams,
) -> Result<(Vec<it_asset_category::Model>, Paging), ServiceError> {
    let query = it_asset_category::Entity::find().order_by_asc(it_asset_category::Column::Name);
    pagination::page(db, query, params).await
}

pub async fn get(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<it_asset_category::Model>, ServiceError> {
    it_asset_category::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    input: CreateItAssetCategory,
) -> Result<it_asset_category::Model, ServiceError> {
    let mut errors = Vec::new();
    let id = input.id.unwrap_or_default();
    if input.id.is_none() {
        errors.push(FieldError::cannot_be_null("id"));
    } else if id <= 0 {
        errors.push(FieldError::invalid_value("id"));
    } else if get(db, id).await?.is_some() {
        errors.push(FieldError::already_exists("id"));
    }
    let name = validate_required_str(
        "name",
        input.name.as_deref(),
        StrRules::max(GENERAL_NAME_MAX_LENGTH),
        &mut errors,
    );
    if errors.is_empty() && name_taken(db, &name).await? {
        errors.push(FieldError::already_exists("name"));
    }
    ensure_valid(errors)?;

    let now = Utc::now();
    it_asset_category::ActiveModel {
        id: Set(id),
        name: Set(name),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
    }
    .insert(db)
    .await
    .map_err(db_err)
}

pub async fn patch(
    db: &DatabaseConnection,
    id: i32,
    input: PatchItAssetCategory,
) -> Result<it_asset_category::Model, ServiceError> {
    let current = get(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("IT asset category"))?;

    let Some(value) = input.name else {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    };

    let mut errors = Vec::new();
    let name = validate_required_str(
        "name",
        value.as_deref(),
        StrRules::max(GENERAL_NAME_MAX_LENGTH),
        &mut errors,
    );
    if errors.is_empty() && name_taken(db, &name).await? {
        errors.push(FieldError::already_exists("name"));
    }
    ensure_valid(errors)?;

    let mut am: it_asset_category::ActiveModel = current.into();
    am.name = Set(name);
    am.last_modified_on = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = it_asset_category::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

async fn name_taken(db: &DatabaseConnection, name: &str) -> Result<bool, ServiceError> {
    let existing = it_asset_category::Entity::find()
        .filter(it_asset_category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(db_err)?;
    Ok(existing.is_some())
}
