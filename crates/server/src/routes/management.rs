//! System users and roles.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

use models::system_role;
use service::management::roles::{self, CreateRole, PatchRole};
use service::management::users::{self, CreateUser, PatchUser, UserView};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

// Users

pub async fn list_users(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<UserView>>, ApiError> {
    let (data, paging) = users::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_user(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CreateUser>,
) -> Result<Response, ApiError> {
    let created = users::create(&state.db, input).await?;
    Ok(envelope::created(
        format!("/management/users/{}", created.id),
        created,
    ))
}

pub async fn get_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Envelope<UserView>>, ApiError> {
    let found = users::get(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i32>,
    ApiJson(input): ApiJson<PatchUser>,
) -> Result<Json<Envelope<UserView>>, ApiError> {
    let updated = users::patch(&state.db, user_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

// Roles

pub async fn list_roles(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<system_role::Model>>, ApiError> {
    let (data, paging) = roles::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_role(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CreateRole>,
) -> Result<Response, ApiError> {
    let created = roles::create(&state.db, input).await?;
    Ok(envelope::created(
        format!("/management/roles/{}", created.id),
        created,
    ))
}

pub async fn get_role(
    State(state): State<ServerState>,
    Path(role_id): Path<i32>,
) -> Result<Json<Envelope<system_role::Model>>, ApiError> {
    let found = roles::get(&state.db, role_id)
        .await?
        .ok_or_else(|| ApiError::not_found("role"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_role(
    State(state): State<ServerState>,
    Path(role_id): Path<i32>,
    ApiJson(input): ApiJson<PatchRole>,
) -> Result<Json<Envelope<system_role::Model>>, ApiError> {
    let updated = roles::patch(&state.db, role_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}
