//! IT service catalog.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use common::constants::GENERAL_NAME_MAX_LENGTH;
use common::types::Paging;
use models::it_service;

use crate::errors::{db_err, ServiceError};
use crate::pagination::{self, PageParams};
use crate::validation::{
    double_option, ensure_valid, validate_required_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItService {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchItService {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
}

pub async fn list(
    db: &DatabaseConnection,
    params: PageParams,
) -> Result<(Vec<it_service::Model>, Paging), ServiceError> {
    let query = it_service::Entity::find().order_by_asc(it_service::Column::Name);
    pagination::page(db, query, params).await
}

pub async fn get(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<it_service::Model>, ServiceError> {
    it_service::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    input: CreateItService,
) -> Result<it_service::Model, ServiceError> {
    let mut errors = Vec::new();
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
    it_service::ActiveModel {
        name: Set(name),
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
    id: i32,
    input: PatchItService,
) -> Result<it_service::Model, ServiceError> {
    let current = get(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("IT service"))?;

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

    let mut am: it_service::ActiveModel = current.into();
    am.name = Set(name);
    am.last_modified_on = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = it_service::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

async fn name_taken(db: &DatabaseConnection, name: &str) -> Result<bool, ServiceError> {
    let existing = it_service::Entity::find()
        .filter(it_service::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(db_err)?;
    Ok(existing.is_some())
}
