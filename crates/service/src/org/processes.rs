//! Process instances under an organization's macroprocess instances.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};

use common::types::Paging;
use models::{organization_macroprocess, organization_process, process};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{check_rating_level, ensure_valid, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct OrgProcessRow {
    pub id: i32,
    pub macroprocess_instance_id: i32,
    pub process_id: i32,
    pub process_name: String,
    pub relevance_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachProcess {
    pub macroprocess_instance_id: Option<i32>,
    pub process_id: Option<i32>,
    pub relevance_level_id: Option<i16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOrgProcess {
    #[serde(default, deserialize_with = "crate::validation::double_option")]
    pub relevance_level_id: Option<Option<i16>>,
}

fn rows(organization_id: i32) -> Select<organization_process::Entity> {
    organization_process::Entity::find()
        .select_only()
        .column(organization_process::Column::Id)
        .column(organization_process::Column::MacroprocessInstanceId)
        .column(organization_process::Column::ProcessId)
        .column_as(process::Column::Name, "process_name")
        .column(organization_process::Column::RelevanceLevelId)
        .column(organization_process::Column::CreatedOn)
        .join(JoinType::InnerJoin, organization_process::Relation::Process.def())
        .filter(organization_process::Column::OrganizationId.eq(organization_id))
        .order_by_asc(process::Column::Name)
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    params: PageParams,
) -> Result<(Vec<OrgProcessRow>, Paging), ServiceError> {
    organizations::require(db, organization_id).await?;
    pagination::page(db, rows(organization_id).into_model::<OrgProcessRow>(), params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
) -> Result<Option<OrgProcessRow>, ServiceError> {
    organizations::require(db, organization_id).await?;
    rows(organization_id)
        .filter(organization_process::Column::Id.eq(instance_id))
        .into_model::<OrgProcessRow>()
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    input: AttachProcess,
) -> Result<OrgProcessRow, ServiceError> {
    organizations::require(db, organization_id).await?;

    let mut errors = Vec::new();
    let macroprocess_instance_id = input.macroprocess_instance_id.unwrap_or_default();
    if input.macroprocess_instance_id.is_none() {
        errors.push(FieldError::cannot_be_null("macroprocessInstanceId"));
    } else {
        let parent = organization_macroprocess::Entity::find_by_id(macroprocess_instance_id)
            .one(db)
            .await
            .map_err(db_err)?;
        if !matches!(parent, Some(p) if p.organization_id == organization_id) {
            errors.push(FieldError::invalid_value("macroprocessInstanceId"));
        }
    }
    let process_id = input.process_id.unwrap_or_default();
    if input.process_id.is_none() {
        errors.push(FieldError::cannot_be_null("processId"));
    } else if process::Entity::find_by_id(process_id)
        .one(db)
        .await
        .map_err(db_err)?
        .is_none()
    {
        errors.push(FieldError::invalid_value("processId"));
    }
    check_rating_level(db, "relevanceLevelId", input.relevance_level_id, &mut errors).await?;
    if errors.is_empty() {
        let duplicate = organization_process::Entity::find()
            .filter(organization_process::Column::MacroprocessInstanceId.eq(macroprocess_instance_id))
            .filter(organization_process::Column::ProcessId.eq(process_id))
            .one(db)
            .await
            .map_err(db_err)?;
        if duplicate.is_some() {
            errors.push(FieldError::already_exists("processId"));
        }
    }
    ensure_valid(errors)?;

    let inserted = organization_process::ActiveModel {
        organization_id: Set(organization_id),
        macroprocess_instance_id: Set(macroprocess_instance_id),
        process_id: Set(process_id),
        relevance_level_id: Set(input.relevance_level_id),
        created_on: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    get(db, organization_id, inserted.id)
        .await?
        .ok_or_else(|| ServiceError::Internal("attached process row missing".into()))
}

pub async fn patch(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
    input: PatchOrgProcess,
) -> Result<OrgProcessRow, ServiceError> {
    organizations::require(db, organization_id).await?;
    let current = organization_process::Entity::find_by_id(instance_id)
        .one(db)
        .await
        .map_err(db_err)?
        .filter(|p| p.organization_id == organization_id)
        .ok_or_else(|| ServiceError::not_found("process instance"))?;

    let Some(relevance) = input.relevance_level_id else {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    };

    let mut errors = Vec::new();
    check_rating_level(db, "relevanceLevelId", relevance, &mut errors).await?;
    ensure_valid(errors)?;

    if relevance != current.relevance_level_id {
        let mut am: organization_process::ActiveModel = current.into();
        am.relevance_level_id = Set(relevance);
        am.update(db).await.map_err(db_err)?;
    }

    get(db, organization_id, instance_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("process instance"))
}

pub async fn delete(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
) -> Result<bool, ServiceError> {
    organizations::require(db, organization_id).await?;
    let res = organization_process::Entity::delete_many()
        .filter(organization_process::Column::Id.eq(instance_id))
        .filter(organization_process::Column::OrganizationId.eq(organization_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
