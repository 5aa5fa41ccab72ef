//! Departments attached to an organization.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};

use common::types::Paging;
use models::{department, organization_department};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{ensure_valid, FieldError};

/// Attached department with its catalog name joined in.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct OrgDepartmentRow {
    pub department_id: i32,
    pub department_name: String,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachDepartment {
    pub department_id: Option<i32>,
}

fn rows(organization_id: i32) -> Select<organization_department::Entity> {
    organization_department::Entity::find()
        .select_only()
        .column(organization_department::Column::DepartmentId)
        .column_as(department::Column::Name, "department_name")
        .column(organization_department::Column::CreatedOn)
        .join(
            JoinType::InnerJoin,
            organization_department::Relation::Department.def(),
        )
        .filter(organization_department::Column::OrganizationId.eq(organization_id))
        .order_by_asc(department::Column::Name)
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    params: PageParams,
) -> Result<(Vec<OrgDepartmentRow>, Paging), ServiceError> {
    organizations::require(db, organization_id).await?;
    pagination::page(db, rows(organization_id).into_model::<OrgDepartmentRow>(), params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    department_id: i32,
) -> Result<Option<OrgDepartmentRow>, ServiceError> {
    organizations::require(db, organization_id).await?;
    rows(organization_id)
        .filter(organization_department::Column::DepartmentId.eq(department_id))
        .into_model::<OrgDepartmentRow>()
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    input: AttachDepartment,
) -> Result<OrgDepartmentRow, ServiceError> {
    organizations::require(db, organization_id).await?;

    let mut errors = Vec::new();
    let department_id = input.department_id.unwrap_or_default();
    if input.department_id.is_none() {
        errors.push(FieldError::cannot_be_null("departmentId"));
    } else if department::Entity::find_by_id(department_id)
        .one(db)
        .await
        .map_err(db_err)?
        .is_none()
    {
        errors.push(FieldError::invalid_value("departmentId"));
    } else if organization_department::Entity::find_by_id((organization_id, department_id))
        .one(db)
        .await
        .map_err(db_err)?
        .is_some()
    {
        errors.push(FieldError::already_exists("departmentId"));
    }
    ensure_valid(errors)?;

    organization_department::ActiveModel {
        organization_id: Set(organization_id),
        department_id: Set(department_id),
        created_on: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    get(db, organization_id, department_id)
        .await?
        .ok_or_else(|| ServiceError::Internal("attached department row missing".into()))
}

/// Detach a department. Its macroprocess instances and everything below them
/// go with it through FK cascades.
pub async fn delete(
    db: &DatabaseConnection,
    organization_id: i32,
    department_id: i32,
) -> Result<bool, ServiceError> {
    organizations::require(db, organization_id).await?;
    let res = organization_department::Entity::delete_by_id((organization_id, department_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
