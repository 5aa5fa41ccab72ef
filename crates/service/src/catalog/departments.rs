//! Department catalog.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use common::constants::GENERAL_NAME_MAX_LENGTH;
use common::types::Paging;
use models::department;

use crate::errors::{db_err, ServiceError};
use crate::pagination::{self, PageParams};
use crate::validation::{
    double_option, ensure_valid, validate_required_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchDepartment {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
}

fn name_rules() -> StrRules {
    StrRules::max(GENERAL_NAME_MAX_LENGTH)
}

pub async fn list(
    db: &DatabaseConnection,
    params: PageParams,
) -> Result<(Vec<department::Model>, Paging), ServiceError> {
    let query = department::Entity::find().order_by_asc(department::Column::Name);
    pagination::page(db, query, params).await
}

pub async fn get(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<department::Model>, ServiceError> {
    department::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    input: CreateDepartment,
) -> Result<department::Model, ServiceError> {
    let mut errors = Vec::new();
    let name = validate_required_str("name", input.name.as_deref(), name_rules(), &mut errors);
    if errors.is_empty() && name_taken(db, &name).await? {
        errors.push(FieldError::already_exists("name"));
    }
    ensure_valid(errors)?;

    let now = Utc::now();
    department::ActiveModel {
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
    input: PatchDepartment,
) -> Result<department::Model, ServiceError> {
    let current = get(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("department"))?;

    let Some(value) = input.name else {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    };

    let mut errors = Vec::new();
    let name = validate_required_str("name", value.as_deref(), name_rules(), &mut errors);
    if errors.is_empty() && name_taken(db, &name).await? {
        errors.push(FieldError::already_exists("name"));
    }
    ensure_valid(errors)?;

    let mut am: department::ActiveModel = current.into();
    am.name = Set(name);
    am.last_modified_on = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = department::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

async fn name_taken(db: &DatabaseConnection, name: &str) -> Result<bool, ServiceError> {
    let existing = department::Entity::find()
        .filter(department::Column::Name.eq(name))
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
    async fn department_catalog_rules() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let name = format!("dept_{}", Uuid::new_v4());
        let created = create(&db, CreateDepartment { name: Some(name.clone()) }).await?;
        assert_eq!(created.name, name);

        let dup = create(&db, CreateDepartment { name: Some(name.clone()) }).await;
        match dup {
            Err(ServiceError::Unprocessable(errors)) => {
                assert_eq!(errors[0].code, ErrorCode::FieldValueAlreadyExists);
            }
            other => panic!("expected duplicate rejection, got {:?}", other.map(|m| m.id)),
        }

        let missing = create(&db, CreateDepartment { name: None }).await;
        match missing {
            Err(ServiceError::Unprocessable(errors)) => {
                assert_eq!(errors[0].code, ErrorCode::FieldCannotBeNull);
                assert_eq!(errors[0].field_name.as_deref(), Some("name"));
            }
            other => panic!("expected null rejection, got {:?}", other.map(|m| m.id)),
        }

        let empty_patch = patch(&db, created.id, PatchDepartment::default()).await;
        match empty_patch {
            Err(ServiceError::Unprocessable(errors)) => {
                assert_eq!(errors[0].code, ErrorCode::NoContent);
            }
            other => panic!("expected NO_CONTENT, got {:?}", other.map(|m| m.id)),
        }

        let renamed = format!("dept_{}", Uuid::new_v4());
        let updated = patch(
            &db,
            created.id,
            PatchDepartment { name: Some(Some(renamed.clone())) },
        )
        .await?;
        assert_eq!(updated.name, renamed);
        assert!(updated.last_modified_on >= created.last_modified_on);

        assert!(delete(&db, created.id).await?);
        assert!(get(&db, created.id).await?.is_none());
        Ok(())
    }
}
