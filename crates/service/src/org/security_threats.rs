//! Security threats rated in the context of one organization. Items are
//! addressed by the catalog threat id, not by the instance row id.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};

use common::types::Paging;
use models::{organization_security_threat, security_threat};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::organizations;
use crate::pagination::{self, PageParams};
use crate::validation::{check_rating_level, double_option, ensure_valid, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct OrgSecurityThreatRow {
    pub id: i32,
    pub security_threat_id: i32,
    pub security_threat_name: String,
    pub threat_level_id: Option<i16>,
    pub created_on: DateTimeWithTimeZone,
    pub last_modified_on: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachSecurityThreat {
    pub security_threat_id: Option<i32>,
    pub threat_level_id: Option<i16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOrgSecurityThreat {
    #[serde(default, deserialize_with = "double_option")]
    pub threat_level_id: Option<Option<i16>>,
}

fn rows(organization_id: i32) -> Select<organization_security_threat::Entity> {
    organization_security_threat::Entity::find()
        .select_only()
        .column(organization_security_threat::Column::Id)
        .column(organization_security_threat::Column::SecurityThreatId)
        .column_as(security_threat::Column::Name, "security_threat_name")
        .column(organization_security_threat::Column::ThreatLevelId)
        .column(organization_security_threat::Column::CreatedOn)
        .column(organization_security_threat::Column::LastModifiedOn)
        .join(
            JoinType::InnerJoin,
            organization_security_threat::Relation::SecurityThreat.def(),
        )
        .filter(organization_security_threat::Column::OrganizationId.eq(organization_id))
        .order_by_asc(security_threat::Column::Name)
}

async fn find_instance(
    db: &DatabaseConnection,
    organization_id: i32,
    security_threat_id: i32,
) -> Result<Option<organization_security_threat::Model>, ServiceError> {
    organization_security_threat::Entity::find()
        .filter(organization_security_threat::Column::OrganizationId.eq(organization_id))
        .filter(organization_security_threat::Column::SecurityThreatId.eq(security_threat_id))
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn list(
    db: &DatabaseConnection,
    organization_id: i32,
    params: PageParams,
) -> Result<(Vec<OrgSecurityThreatRow>, Paging), ServiceError> {
    organizations::require(db, organization_id).await?;
    pagination::page(db, rows(organization_id).into_model::<OrgSecurityThreatRow>(), params).await
}

pub async fn get(
    db: &DatabaseConnection,
    organization_id: i32,
    security_threat_id: i32,
) -> Result<Option<OrgSecurityThreatRow>, ServiceError> {
    organizations::require(db, organization_id).await?;
    rows(organization_id)
        .filter(organization_security_threat::Column::SecurityThreatId.eq(security_threat_id))
        .into_model::<OrgSecurityThreatRow>()
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn create(
    db: &DatabaseConnection,
    organization_id: i32,
    input: AttachSecurityThreat,
) -> Result<OrgSecurityThreatRow, ServiceError> {
    organizations::require(db, organization_id).await?;

    let mut errors = Vec::new();
    let security_threat_id = input.security_threat_id.unwrap_or_default();
    if input.security_threat_id.is_none() {
        errors.push(FieldError::cannot_be_null("securityThreatId"));
    } else if security_threat::Entity::find_by_id(security_threat_id)
        .one(db)
        .await
        .map_err(db_err)?
        .is_none()
    {
        errors.push(FieldError::invalid_value("securityThreatId"));
    } else if find_instance(db, organization_id, security_threat_id)
        .await?
        .is_some()
    {
        errors.push(FieldError::already_exists("securityThreatId"));
    }
    check_rating_level(db, "threatLevelId", input.threat_level_id, &mut errors).await?;
    ensure_valid(errors)?;

    let now = Utc::now();
    organization_security_threat::ActiveModel {
        organization_id: Set(organization_id),
        security_threat_id: Set(security_threat_id),
        threat_level_id: Set(input.threat_level_id),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    get(db, organization_id, security_threat_id)
        .await?
        .ok_or_else(|| ServiceError::Internal("attached threat row missing".into()))
}

pub async fn patch(
    db: &DatabaseConnection,
    organization_id: i32,
    security_threat_id: i32,
    input: PatchOrgSecurityThreat,
) -> Result<OrgSecurityThreatRow, ServiceError> {
    organizations::require(db, organization_id).await?;
    let current = find_instance(db, organization_id, security_threat_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("security threat instance"))?;

    let Some(level) = input.threat_level_id else {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    };

    let mut errors = Vec::new();
    check_rating_level(db, "threatLevelId", level, &mut errors).await?;
    ensure_valid(errors)?;

    if level != current.threat_level_id {
        let mut am: organization_security_threat::ActiveModel = current.into();
        am.threat_level_id = Set(level);
        am.last_modified_on = Set(Utc::now().into());
        am.update(db).await.map_err(db_err)?;
    }

    get(db, organization_id, security_threat_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("security threat instance"))
}

pub async fn delete(
    db: &DatabaseConnection,
    organization_id: i32,
    security_threat_id: i32,
) -> Result<bool, ServiceError> {
    organizations::require(db, organization_id).await?;
    let res = organization_security_threat::Entity::delete_many()
        .filter(organization_security_threat::Column::OrganizationId.eq(organization_id))
        .filter(organization_security_threat::Column::SecurityThreatId.eq(security_threat_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
