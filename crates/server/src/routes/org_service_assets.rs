//! IT assets linked to one IT service instance of an organization.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use service::org::service_assets::{self, AttachServiceAsset, PatchServiceAsset, ServiceAssetRow};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn list(
    State(state): State<ServerState>,
    Path((organization_code, service_instance_id)): Path<(i32, i32)>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<ServiceAssetRow>>, ApiError> {
    let (data, paging) =
        service_assets::list(&state.db, organization_code, service_instance_id, page.into())
            .await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path((organization_code, service_instance_id)): Path<(i32, i32)>,
    ApiJson(input): ApiJson<AttachServiceAsset>,
) -> Result<Response, ApiError> {
    let created =
        service_assets::create(&state.db, organization_code, service_instance_id, input).await?;
    Ok(envelope::created(
        format!(
            "/organizations/{}/itServices/{}/itAssets/{}",
            organization_code, service_instance_id, created.it_asset_instance_id
        ),
        created,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, service_instance_id, asset_instance_id)): Path<(i32, i32, i32)>,
) -> Result<Json<Envelope<ServiceAssetRow>>, ApiError> {
    let found = service_assets::get(
        &state.db,
        organization_code,
        service_instance_id,
        asset_instance_id,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("IT asset link"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch(
    State(state): State<ServerState>,
    Path((organization_code, service_instance_id, asset_instance_id)): Path<(i32, i32, i32)>,
    ApiJson(input): ApiJson<PatchServiceAsset>,
) -> Result<Json<Envelope<ServiceAssetRow>>, ApiError> {
    let updated = service_assets::patch(
        &state.db,
        organization_code,
        service_instance_id,
        asset_instance_id,
        input,
    )
    .await?;
    Ok(Json(Envelope { data: updated }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((organization_code, service_instance_id, asset_instance_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let removed = service_assets::delete(
        &state.db,
        organization_code,
        service_instance_id,
        asset_instance_id,
    )
    .await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("IT asset link"))
    }
}
