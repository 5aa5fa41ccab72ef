//! IT asset catalog.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use common::constants::{GENERAL_DESCRIPTION_MAX_LENGTH, GENERAL_NAME_MAX_LENGTH};
use common::types::Paging;
use models::{it_asset, it_asset_category};

use crate::errors::{db_err, ServiceError};
use crate::pagination::{self, PageParams};
use crate::validation::{
    double_option, ensure_valid, validate_required_str, validate_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItAsset {
    pub name: Option<String>,
    pub category_id: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchItAsset {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl PatchItAsset {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.category_id.is_none() && self.description.is_none()
    }
}

pub async fn list(
    db: &DatabaseConnection,
    params: PageParams,
) -> Result<(Vec<it_asset::Model>, Paging), ServiceError> {
    let query = it_asset::Entity::find().order_by_asc(it_asset::Column::Name);
    pagination::page(db, query, params).await
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<it_asset::Model>, ServiceError> {
    it_asset::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    input: CreateItAsset,
) -> Result<it_asset::Model, ServiceError> {
    let mut errors = Vec::new();
    let name = validate_required_str(
        "name",
        input.name.as_deref(),
        StrRules::max(GENERAL_NAME_MAX_LENGTH),
        &mut errors,
    );
    let category_id = input.category_id.unwrap_or_default();
    if input.category_id.is_none() {
        errors.push(FieldError::cannot_be_null("categoryId"));
    } else if !category_exists(db, category_id).await? {
        errors.push(FieldError::invalid_value("categoryId"));
    }
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
    it_asset::ActiveModel {
        name: Set(name),
        category_id: Set(category_id),
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
    input: PatchItAsset,
) -> Result<it_asset::Model, ServiceError> {
    let current = get(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("IT asset"))?;

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
    let mut new_category = None;
    if let Some(value) = input.category_id {
        match value {
            None => errors.push(FieldError::cannot_be_null("categoryId")),
            Some(category_id) => {
                if !category_exists(db, category_id).await? {
                    errors.push(FieldError::invalid_value("categoryId"));
                }
                new_category = Some(category_id);
            }
        }
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

    let mut am: it_asset::ActiveModel = current.clone().into();
    let mut changed = false;
    if let Some(name) = new_name {
        if name != current.name {
            am.name = Set(name);
            changed = true;
        }
    }
    if let Some(category_id) = new_category {
        if category_id != current.category_id {
            am.category_id = Set(category_id);
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
    let res = it_asset::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

async fn category_exists(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let found = it_asset_category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?;
    Ok(found.is_some())
}

async fn name_taken(db: &DatabaseConnection, name: &str) -> Result<bool, ServiceError> {
    let existing = it_asset::Entity::find()
        .filter(it_asset::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(db_err)?;
    Ok(existing.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::validation::ErrorCode;
    use uuid::Uuid;

    #[tokio::test]
    async fn asset_requires_known_category() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let orphan = create(
            &db,
            CreateItAsset {
                name: Some(format!("asset_{}", Uuid::new_v4())),
                category_id: Some(-42),
                description: None,
            },
        )
        .await;
        match orphan {
            Err(ServiceError::Unprocessable(errors)) => {
                assert_eq!(errors[0].code, ErrorCode::FieldValueInvalid);
                assert_eq!(errors[0].field_name.as_deref(), Some("categoryId"));
            }
            other => panic!("expected category rejection, got {:?}", other.map(|m| m.id)),
        }

        // Null name and null category are both reported in one response.
        let nothing = create(
            &db,
            CreateItAsset { name: None, category_id: None, description: None },
        )
        .await;
        match nothing {
            Err(ServiceError::Unprocessable(errors)) => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected two field errors, got {:?}", other.map(|m| m.id)),
        }
        Ok(())
    }
}
