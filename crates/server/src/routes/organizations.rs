use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use models::organization;
use service::organizations::{self, CreateOrganization, PatchOrganization};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::openapi::{CreateOrganizationDoc, PatchOrganizationDoc};
use crate::state::ServerState;

#[utoipa::path(
    get,
    path = "/organizations",
    tag = "organizations",
    params(PageQuery),
    responses((status = 200, description = "Paged list of organizations"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<organization::Model>>, ApiError> {
    let (data, paging) = organizations::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

#[utoipa::path(
    post,
    path = "/organizations",
    tag = "organizations",
    request_body = CreateOrganizationDoc,
    responses(
        (status = 201, description = "Organization created, Location points at it"),
        (status = 422, description = "Validation problems, one entry per field")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CreateOrganization>,
) -> Result<Response, ApiError> {
    let created = organizations::create(&state.db, input).await?;
    Ok(envelope::created(
        format!("/organizations/{}", created.id),
        created,
    ))
}

#[utoipa::path(
    get,
    path = "/organizations/{organization_code}",
    tag = "organizations",
    params(("organization_code" = i32, Path, description = "Organization id")),
    responses(
        (status = 200, description = "The organization"),
        (status = 404, description = "Unknown organization")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
) -> Result<Json<Envelope<organization::Model>>, ApiError> {
    let found = organizations::get(&state.db, organization_code)
        .await?
        .ok_or_else(|| ApiError::not_found("organization"))?;
    Ok(Json(Envelope { data: found }))
}

#[utoipa::path(
    patch,
    path = "/organizations/{organization_code}",
    tag = "organizations",
    params(("organization_code" = i32, Path, description = "Organization id")),
    request_body = PatchOrganizationDoc,
    responses(
        (status = 200, description = "Updated organization"),
        (status = 404, description = "Unknown organization"),
        (status = 422, description = "Validation problems or empty patch")
    )
)]
pub async fn patch(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    ApiJson(input): ApiJson<PatchOrganization>,
) -> Result<Json<Envelope<organization::Model>>, ApiError> {
    let updated = organizations::patch(&state.db, organization_code, input).await?;
    Ok(Json(Envelope { data: updated }))
}

#[utoipa::path(
    delete,
    path = "/organizations/{organization_code}",
    tag = "organizations",
    params(("organization_code" = i32, Path, description = "Organization id")),
    responses(
        (status = 204, description = "Organization and all scoped data removed"),
        (status = 404, description = "Unknown organization")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if organizations::delete(&state.db, organization_code).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("organization"))
    }
}
