//! IT service instances supporting an organization's process instances.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};

use common::types::Paging;
use models::{it_service, organization_it_service, organization_process};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{check_rating_level, double_option, ensure_valid, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct OrgItServiceRow {
    pub id: i32,
    pub process_instance_id: i32,
    pub it_service_id: i32,
    pub it_service_name: String,
    pub relevance_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachItService {
    pub process_instance_id: Option<i32>,
    pub it_service_id: Option<i32>,
    pub relevance_level_id: Option<i16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOrgItService {
    #[serde(default, deserialize_with = "double_option")]
    pub relevance_level_id: Option<Option<i16>>,
}

fn rows(organization_id: i32) -> Select<organization_it_service::Entity> {
    organization_it_service::Entity::find()
        .select_only()
        .column(organization_it_service::Column::Id)
        .column(organization_it_service::Column::ProcessInstanceId)
        .column(organization_it_service::Column::ItServiceId)
        .column_as(it_service::Column::Name, "it_service_name")
        .column(organization_it_service::Column::RelevanceLevelId)
        .column(organization_it_service::Column::CreatedOn)
        .join(
            JoinType::InnerJoin,
            organization_it_service::Relation::ItService.def(),
        )
        .filter(organization_it_service::Column::OrganizationId.eq(organization_id))
        .order_by_asc(it_service::Column::Name)
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    params: PageParams,
) -> Result<(Vec<OrgItServiceRow>, Paging), ServiceError> {
    organizations::require(db, organization_id).await?;
    pagination::page(db, rows(organization_id).into_model::<OrgItServiceRow>(), params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
) -> Result<Option<OrgItServiceRow>, ServiceError> {
    organizations::require(db, organization_id).await?;
    rows(organization_id)
        .filter(organization_it_service::Column::Id.eq(instance_id))
        .into_model::<OrgItServiceRow>()
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    input: AttachItService,
) -> Result<OrgItServiceRow, ServiceError> {
    organizations::require(db, organization_id).await?;

    let mut errors = Vec::new();
    let process_instance_id = input.process_instance_id.unwrap_or_default();
    if input.process_instance_id.is_none() {
        errors.push(FieldError::cannot_be_null("processInstanceId"));
    } else {
        let parent = organization_process::Entity::find_by_id(process_instance_id)
            .one(db)
            .await
            .map_err(db_err)?;
        if !matches!(parent, Some(p) if p.organization_id == organization_id) {
            errors.push(FieldError::invalid_value("processInstanceId"));
        }
    }
    let it_service_id = input.it_service_id.unwrap_or_default();
    if input.it_service_id.is_none() {
        errors.push(FieldError::cannot_be_null("itServiceId"));
    } else if it_service::Entity::find_by_id(it_service_id)
        .one(db)
        .await
        .map_err(db_err)?
        .is_none()
    {
        errors.push(FieldError::invalid_value("itServiceId"));
    }
    check_rating_level(db, "relevanceLevelId", input.relevance_level_id, &mut errors).await?;
    if errors.is_empty() {
        let duplicate = organization_it_service::Entity::find()
            .filter(organization_it_service::Column::ProcessInstanceId.eq(process_instance_id))
            .filter(organization_it_service::Column::ItServiceId.eq(it_service_id))
            .one(db)
            .await
            .map_err(db_err)?;
        if duplicate.is_some() {
            errors.push(FieldError::already_exists("itServiceId"));
        }
    }
    ensure_valid(errors)?;

    let inserted = organization_it_service::ActiveModel {
        organization_id: Set(organization_id),
        process_instance_id: Set(process_instance_id),
        it_service_id: Set(it_service_id),
        relevance_level_id: Set(input.relevance_level_id),
        created_on: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    get(db, organization_id, inserted.id)
        .await?
        .ok_or_else(|| ServiceError::Internal("attached IT service row missing".into()))
}

pub async fn patch(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
    input: PatchOrgItService,
) -> Result<OrgItServiceRow, ServiceError> {
    organizations::require(db, organization_id).await?;
    let current = organization_it_service::Entity::find_by_id(instance_id)
        .one(db)
        .await
        .map_err(db_err)?
        .filter(|s| s.organization_id == organization_id)
        .ok_or_else(|| ServiceError::not_found("IT service instance"))?;

    let Some(relevance) = input.relevance_level_id else {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    };

    let mut errors = Vec::new();
    check_rating_level(db, "relevanceLevelId", relevance, &mut errors).await?;
    ensure_valid(errors)?;

    if relevance != current.relevance_level_id {
        let mut am: organization_it_service::ActiveModel = current.into();
        am.relevance_level_id = Set(relevance);
        am.update(db).await.map_err(db_err)?;
    }

    get(db, organization_id, instance_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("IT service instance"))
}

pub async fn delete(
    db: &DatabaseConnection,
    organization_id: i32,
    instance_id: i32,
) -> Result<bool, ServiceError> {
    organizations::require(db, organization_id).await?;
    let res = organization_it_service::Entity::delete_many()
        .filter(organization_it_service::Column::Id.eq(instance_id))
        .filter(organization_it_service::Column::OrganizationId.eq(organization_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
