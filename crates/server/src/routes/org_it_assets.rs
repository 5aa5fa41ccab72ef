use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use service::org::it_assets::{self, AttachItAsset, OrgItAssetRow, PatchOrgItAsset};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn list(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<OrgItAssetRow>>, ApiError> {
    let (data, paging) = it_assets::list(&state.db, organization_code, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    ApiJson(input): ApiJson<AttachItAsset>,
) -> Result<Response, ApiError> {
    let created = it_assets::create(&state.db, organization_code, input).await?;
    Ok(envelope::created(
        format!(
            "/organizations/{}/itAssets/{}",
            organization_code, created.id
        ),
        created,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, asset_instance_id)): Path<(i32, i32)>,
) -> Result<Json<Envelope<OrgItAssetRow>>, ApiError> {
    let found = it_assets::get(&state.db, organization_code, asset_instance_id)
        .await?
        .ok_or_else(|| ApiError::not_found("IT asset"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch(
    State(state): State<ServerState>,
    Path((organization_code, asset_instance_id)): Path<(i32, i32)>,
    ApiJson(input): ApiJson<PatchOrgItAsset>,
) -> Result<Json<Envelope<OrgItAssetRow>>, ApiError> {
    let updated = it_assets::patch(&state.db, organization_code, asset_instance_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((organization_code, asset_instance_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    if it_assets::delete(&state.db, organization_code, asset_instance_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("IT asset"))
    }
}
