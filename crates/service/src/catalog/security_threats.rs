//! Security threat catalog.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use common::constants::{GENERAL_DESCRIPTION_MAX_LENGTH, GENERAL_NAME_MAX_LENGTH};
use common::types::Paging;
use models::security_threat;

use crate::errors::{db_err, ServiceError};
use crate::pagination::{self, PageParams};
use crate::validation::{
    double_option, ensure_valid, validate_required_str, validate_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecurityThreat {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSecurityThreat {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl PatchSecurityThreat {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

pub async fn list(
    db: &DatabaseConnection,
    params: PageParams,
) -> Result<(Vec<security_threat::Model>, Paging), ServiceError> {
    let query = security_threat::Entity::find().order_by_asc(security_threat::Column::Name);
    pagination::page(db, query, params).await
}

pub async fn get(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<security_threat::Model>, ServiceError> {
    security_threat::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    input: CreateSecurityThreat,
) -> Result<security_threat::Model, ServiceError> {
    let mut errors = Vec::new();
    let name = validate_required_str(
        "name",
        input.name.as_deref(),
        StrRules::max(GENERAL_NAME_MAX_LENGTH),
        &mut errors,
    );
    let description = validate_str(
        "description",
        input.description.as_deref(),
        StrRules::max(GENERAL_DESCRIPTION_MAX_LENGTH),
        &mut errors,
    );
    if errors.is_empty() && name_taken(db, &name).await? {
        errors.push(FieldError::already_exists("name"));
    }
    ensure_valid(errors)?;

    let now = Utc::now();
    security_threat::ActiveModel {
        name: Set(name),
        description: Set(description),
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
    input: PatchSecurityThreat,
) -> Result<security_threat::Model, ServiceError> {
    let current = get(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("security threat"))?;

    if input.is_empty() {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    }

    let mut errors = Vec::new();
    let mut new_name = None;
    if let Some(value) = &input.name {
        let name = validate_required_str(
            "name",
            value.as_deref(),
            StrRules::max(GENERAL_NAME_MAX_LENGTH),
            &mut errors,
        );
        if errors.is_empty() && name_taken(db, &name).await? {
            errors.push(FieldError::already_exists("name"));
        }
        new_name = Some(name);
    }
    let mut new_description = None;
    if let Some(value) = &input.description {
        new_description = Some(validate_str(
            "description",
            value.as_deref(),
            StrRules::max(GENERAL_DESCRIPTION_MAX_LENGTH),
            &mut errors,
        ));
    }
    ensure_valid(errors)?;

    let mut am: security_threat::ActiveModel = current.clone().into();
    let mut changed = false;
    if let Some(name) = new_name {
        if name != current.name {
            am.name = Set(name);
            changed = true;
        }
    }
    if let Some(description) = new_description {
        if description != current.description {
            am.description = Set(description);
            changed = true;
        }
    }
    if !changed {
        return Ok(current);
    }
    am.last_modified_on = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = security_threat::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

async fn name_taken(db: &DatabaseConnection, name: &str) -> Result<bool, ServiceError> {
    let existing = security_threat::Entity::find()
        .filter(security_threat::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(db_err)?;
    Ok(existing.is_some())
}
