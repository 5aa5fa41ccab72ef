//! Security threats tracked by an organization, keyed by catalog threat id.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use service::org::security_threats::{
    self, AttachSecurityThreat, OrgSecurityThreatRow, PatchOrgSecurityThreat,
};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn list(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<OrgSecurityThreatRow>>, ApiError> {
    let (data, paging) = security_threats::list(&state.db, organization_code, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    ApiJson(input): ApiJson<AttachSecurityThreat>,
) -> Result<Response, ApiError> {
    let created = security_threats::create(&state.db, organization_code, input).await?;
    Ok(envelope::created(
        format!(
            "/organizations/{}/securityThreats/{}",
            organization_code, created.security_threat_id
        ),
        created,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, security_threat_id)): Path<(i32, i32)>,
) -> Result<Json<Envelope<OrgSecurityThreatRow>>, ApiError> {
    let found = security_threats::get(&state.db, organization_code, security_threat_id)
        .await?
        .ok_or_else(|| ApiError::not_found("security threat"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch(
    State(state): State<ServerState>,
    Path((organization_code, security_threat_id)): Path<(i32, i32)>,
    ApiJson(input): ApiJson<PatchOrgSecurityThreat>,
) -> Result<Json<Envelope<OrgSecurityThreatRow>>, ApiError> {
    let updated =
        security_threats::patch(&state.db, organization_code, security_threat_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((organization_code, security_threat_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    if security_threats::delete(&state.db, organization_code, security_threat_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("security threat"))
    }
}
