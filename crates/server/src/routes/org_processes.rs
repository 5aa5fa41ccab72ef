use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use service::org::processes::{self, AttachProcess, OrgProcessRow, PatchOrgProcess};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn list(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<OrgProcessRow>>, ApiError> {
    let (data, paging) = processes::list(&state.db, organization_code, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    ApiJson(input): ApiJson<AttachProcess>,
) -> Result<Response, ApiError> {
    let created = processes::create(&state.db, organization_code, input).await?;
    Ok(envelope::created(
        format!(
            "/organizations/{}/processes/{}",
            organization_code, created.id
        ),
        created,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, process_instance_id)): Path<(i32, i32)>,
) -> Result<Json<Envelope<OrgProcessRow>>, ApiError> {
    let found = processes::get(&state.db, organization_code, process_instance_id)
        .await?
        .ok_or_else(|| ApiError::not_found("process"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch(
    State(state): State<ServerState>,
    Path((organization_code, process_instance_id)): Path<(i32, i32)>,
    ApiJson(input): ApiJson<PatchOrgProcess>,
) -> Result<Json<Envelope<OrgProcessRow>>, ApiError> {
    let updated =
        processes::patch(&state.db, organization_code, process_instance_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((organization_code, process_instance_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    if processes::delete(&state.db, organization_code, process_instance_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("process"))
    }
}
