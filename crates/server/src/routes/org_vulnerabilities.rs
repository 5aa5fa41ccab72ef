//! Vulnerabilities recorded against one IT asset instance.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use models::organization_it_asset_vulnerability as vulnerability;
use service::org::vulnerabilities::{self, CreateVulnerability, PatchVulnerability};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn list(
    State(state): State<ServerState>,
    Path((organization_code, asset_instance_id)): Path<(i32, i32)>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<vulnerability::Model>>, ApiError> {
    let (data, paging) =
        vulnerabilities::list(&state.db, organization_code, asset_instance_id, page.into())
            .await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path((organization_code, asset_instance_id)): Path<(i32, i32)>,
    ApiJson(input): ApiJson<CreateVulnerability>,
) -> Result<Response, ApiError> {
    let created =
        vulnerabilities::create(&state.db, organization_code, asset_instance_id, input).await?;
    Ok(envelope::created(
        format!(
            "/organizations/{}/itAssets/{}/vulnerabilities/{}",
            organization_code, asset_instance_id, created.id
        ),
        created,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, asset_instance_id, vulnerability_id)): Path<(i32, i32, i32)>,
) -> Result<Json<Envelope<vulnerability::Model>>, ApiError> {
    let found = vulnerabilities::get(
        &state.db,
        organization_code,
        asset_instance_id,
        vulnerability_id,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("vulnerability"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch(
    State(state): State<ServerState>,
    Path((organization_code, asset_instance_id, vulnerability_id)): Path<(i32, i32, i32)>,
    ApiJson(input): ApiJson<PatchVulnerability>,
) -> Result<Json<Envelope<vulnerability::Model>>, ApiError> {
    let updated = vulnerabilities::patch(
        &state.db,
        organization_code,
        asset_instance_id,
        vulnerability_id,
        input,
    )
    .await?;
    Ok(Json(Envelope { data: updated }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((organization_code, asset_instance_id, vulnerability_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let removed = vulnerabilities::delete(
        &state.db,
        organization_code,
        asset_instance_id,
        vulnerability_id,
    )
    .await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("vulnerability"))
    }
}
