use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

use models::{organization_analysis, organization_analysis_detail};
use service::analysis::{self, CreateAnalysis, PatchAnalysis};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::openapi::CreateAnalysisDoc;
use crate::state::ServerState;

#[utoipa::path(
    post,
    path = "/organizations/{organization_code}/analyses",
    tag = "analyses",
    params(("organization_code" = i32, Path, description = "Organization id")),
    request_body = CreateAnalysisDoc,
    responses(
        (status = 201, description = "Analysis executed and stored, Location points at it"),
        (status = 404, description = "Unknown organization"),
        (status = 422, description = "Validation problems")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    ApiJson(input): ApiJson<CreateAnalysis>,
) -> Result<Response, ApiError> {
    let created = analysis::create(&state.db, organization_code, input).await?;
    Ok(envelope::created(
        format!("/organizations/{}/analyses/{}", organization_code, created.id),
        created,
    ))
}

#[utoipa::path(
    get,
    path = "/organizations/{organization_code}/analyses",
    tag = "analyses",
    params(("organization_code" = i32, Path, description = "Organization id"), PageQuery),
    responses(
        (status = 200, description = "Paged list of analyses, newest first"),
        (status = 404, description = "Unknown organization")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<organization_analysis::Model>>, ApiError> {
    let (data, paging) = analysis::list(&state.db, organization_code, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

#[utoipa::path(
    get,
    path = "/organizations/{organization_code}/analyses/{analysis_id}",
    tag = "analyses",
    params(
        ("organization_code" = i32, Path, description = "Organization id"),
        ("analysis_id" = i32, Path, description = "Analysis id")
    ),
    responses(
        (status = 200, description = "The analysis"),
        (status = 404, description = "Unknown organization or analysis")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, analysis_id)): Path<(i32, i32)>,
) -> Result<Json<Envelope<organization_analysis::Model>>, ApiError> {
    let found = analysis::get(&state.db, organization_code, analysis_id)
        .await?
        .ok_or_else(|| ApiError::not_found("analysis"))?;
    Ok(Json(Envelope { data: found }))
}

#[utoipa::path(
    patch,
    path = "/organizations/{organization_code}/analyses/{analysis_id}",
    tag = "analyses",
    params(
        ("organization_code" = i32, Path, description = "Organization id"),
        ("analysis_id" = i32, Path, description = "Analysis id")
    ),
    responses(
        (status = 200, description = "Updated analysis"),
        (status = 404, description = "Unknown organization or analysis"),
        (status = 422, description = "Empty patch or invalid description")
    )
)]
pub async fn patch(
    State(state): State<ServerState>,
    Path((organization_code, analysis_id)): Path<(i32, i32)>,
    ApiJson(input): ApiJson<PatchAnalysis>,
) -> Result<Json<Envelope<organization_analysis::Model>>, ApiError> {
    let updated = analysis::patch(&state.db, organization_code, analysis_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

#[utoipa::path(
    get,
    path = "/organizations/{organization_code}/analyses/{analysis_id}/details",
    tag = "analyses",
    params(
        ("organization_code" = i32, Path, description = "Organization id"),
        ("analysis_id" = i32, Path, description = "Analysis id"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Paged detail rows with impact, probability and risk"),
        (status = 404, description = "Unknown organization or analysis")
    )
)]
pub async fn list_details(
    State(state): State<ServerState>,
    Path((organization_code, analysis_id)): Path<(i32, i32)>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<organization_analysis_detail::Model>>, ApiError> {
    let (data, paging) =
        analysis::list_details(&state.db, organization_code, analysis_id, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}
