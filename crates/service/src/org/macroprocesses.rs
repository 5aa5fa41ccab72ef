//! Macroprocess instances inside an organization's departments.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};

use common::types::Paging;
use models::{department, macroprocess, organization_department, organization_macroprocess};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{ensure_valid, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct OrgMacroprocessRow {
    pub id: i32,
    pub department_id: i32,
    pub department_name: String,
    pub macroprocess_id: i32,
    pub macroprocess_name: String,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachMacroprocess {
    pub department_id: Option<i32>,
    pub macroprocess_id: Option<i32>,
}

fn rows(organization_id: i32) -> Select<organization_macroprocess::Entity> {
    organization_macroprocess::Entity::find()
        .select_only()
        .column(organization_macroprocess::Column::Id)
        .column(organization_macroprocess::Column::DepartmentId)
        .column_as(department::Column::Name, "department_name")
        .column(organization_macroprocess::Column::MacroprocessId)
        .column_as(macroprocess::Column::Name, "macroprocess_name")
        .column(organization_macroprocess::Column::CreatedOn)
        .join(
            JoinType::InnerJoin,
            organization_macroprocess::Relation::Department.def(),
        )
        .join(
            JoinType::InnerJoin,
            organization_macroprocess::Relation::Macroprocess.def(),
        )
        .filter(organization_macroprocess::Column::OrganizationId.eq(organization_id))
        .order_by_asc(department::Column::Name)
        .order_by_asc(macroprocess::Column::Name)
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    params: PageParams,
) -> Result<(Vec<OrgMacroprocessRow>, Paging), ServiceError> {
    organizations::require(db, organization_id).await?;
    pagination::page(db, rows(organization_id).into_model::<OrgMacroprocessRow>(), params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
) -> Result<Option<OrgMacroprocessRow>, ServiceError> {
    organizations::require(db, organization_id).await?;
    rows(organization_id)
        .filter(organization_macroprocess::Column::Id.eq(instance_id))
        .into_model::<OrgMacroprocessRow>()
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    input: AttachMacroprocess,
) -> Result<OrgMacroprocessRow, ServiceError> {
    organizations::require(db, organization_id).await?;

    let mut errors = Vec::new();
    let department_id = input.department_id.unwrap_or_default();
    if input.department_id.is_none() {
        errors.push(FieldError::cannot_be_null("departmentId"));
    } else if organization_department::Entity::find_by_id((organization_id, department_id))
        .one(db)
        .await
        .map_err(db_err)?
        .is_none()
    {
        // The department must already be attached to this organization.
        errors.push(FieldError::invalid_value("departmentId"));
    }
    let macroprocess_id = input.macroprocess_id.unwrap_or_default();
    if input.macroprocess_id.is_none() {
        errors.push(FieldError::cannot_be_null("macroprocessId"));
    } else if macroprocess::Entity::find_by_id(macroprocess_id)
        .one(db)
        .await
        .map_err(db_err)?
        .is_none()
    {
        errors.push(FieldError::invalid_value("macroprocessId"));
    }
    if errors.is_empty() {
        let duplicate = organization_macroprocess::Entity::find()
            .filter(organization_macroprocess::Column::OrganizationId.eq(organization_id))
            .filter(organization_macroprocess::Column::DepartmentId.eq(department_id))
            .filter(organization_macroprocess::Column::MacroprocessId.eq(macroprocess_id))
            .one(db)
            .await
            .map_err(db_err)?;
        if duplicate.is_some() {
            errors.push(FieldError::already_exists("macroprocessId"));
        }
    }
    ensure_valid(errors)?;

    let inserted = organization_macroprocess::ActiveModel {
        organization_id: Set(organization_id),
        department_id: Set(department_id),
        macroprocess_id: Set(macroprocess_id),
        created_on: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    get(db, organization_id, inserted.id)
        .await?
        .ok_or_else(|| ServiceError::Internal("attached macroprocess row missing".into()))
}

pub async fn delete(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
) -> Result<bool, ServiceError> {
    organizations::require(db, organization_id).await?;
    let res = organization_macroprocess::Entity::delete_many()
        .filter(organization_macroprocess::Column::Id.eq(instance_id))
        .filter(organization_macroprocess::Column::OrganizationId.eq(organization_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
