use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use service::org::it_services::{self, AttachItService, OrgItServiceRow, PatchOrgItService};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn list(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<OrgItServiceRow>>, ApiError> {
    let (data, paging) = it_services::list(&state.db, organization_code, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    ApiJson(input): ApiJson<AttachItService>,
) -> Result<Response, ApiError> {
    let created = it_services::create(&state.db, organization_code, input).await?;
    Ok(envelope::created(
        format!(
            "/organizations/{}/itServices/{}",
            organization_code, created.id
        ),
        created,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, service_instance_id)): Path<(i32, i32)>,
) -> Result<Json<Envelope<OrgItServiceRow>>, ApiError> {
    let found = it_services::get(&state.db, organization_code, service_instance_id)
        .await?
        .ok_or_else(|| ApiError::not_found("IT service"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch(
    State(state): State<ServerState>,
    Path((organization_code, service_instance_id)): Path<(i32, i32)>,
    ApiJson(input): ApiJson<PatchOrgItService>,
) -> Result<Json<Envelope<OrgItServiceRow>>, ApiError> {
    let updated =
        it_services::patch(&state.db, organization_code, service_instance_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((organization_code, service_instance_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    if it_services::delete(&state.db, organization_code, service_instance_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("IT service"))
    }
}
