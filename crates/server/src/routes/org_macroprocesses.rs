use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use service::org::macroprocesses::{self, AttachMacroprocess, OrgMacroprocessRow};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn list(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<OrgMacroprocessRow>>, ApiError> {
    let (data, paging) = macroprocesses::list(&state.db, organization_code, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    ApiJson(input): ApiJson<AttachMacroprocess>,
) -> Result<Response, ApiError> {
    let created = macroprocesses::create(&state.db, organization_code, input).await?;
    Ok(envelope::created(
        format!(
            "/organizations/{}/macroprocesses/{}",
            organization_code, created.id
        ),
        created,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, macroprocess_instance_id)): Path<(i32, i32)>,
) -> Result<Json<Envelope<OrgMacroprocessRow>>, ApiError> {
    let found = macroprocesses::get(&state.db, organization_code, macroprocess_instance_id)
        .await?
        .ok_or_else(|| ApiError::not_found("macroprocess"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((organization_code, macroprocess_instance_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    if macroprocesses::delete(&state.db, organization_code, macroprocess_instance_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("macroprocess"))
    }
}
