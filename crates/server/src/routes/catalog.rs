//! Shared catalog resources. These are plain dictionaries: organizations
//! reference them but never own them, so there is no delete surface here.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

use models::{department, it_asset, it_asset_category, it_service, macroprocess, process, security_threat};
use service::catalog;

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

// Departments

pub async fn list_departments(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<department::Model>>, ApiError> {
    let (data, paging) = catalog::departments::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_department(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<catalog::departments::CreateDepartment>,
) -> Result<Response, ApiError> {
    let created = catalog::departments::create(&state.db, input).await?;
    Ok(envelope::created(format!("/departments/{}", created.id), created))
}

pub async fn get_department(
    State(state): State<ServerState>,
    Path(department_id): Path<i32>,
) -> Result<Json<Envelope<department::Model>>, ApiError> {
    let found = catalog::departments::get(&state.db, department_id)
        .await?
        .ok_or_else(|| ApiError::not_found("department"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_department(
    State(state): State<ServerState>,
    Path(department_id): Path<i32>,
    ApiJson(input): ApiJson<catalog::departments::PatchDepartment>,
) -> Result<Json<Envelope<department::Model>>, ApiError> {
    let updated = catalog::departments::patch(&state.db, department_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

// Macroprocesses

pub async fn list_macroprocesses(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<macroprocess::Model>>, ApiError> {
    let (data, paging) = catalog::macroprocesses::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_macroprocess(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<catalog::macroprocesses::CreateMacroprocess>,
) -> Result<Response, ApiError> {
    let created = catalog::macroprocesses::create(&state.db, input).await?;
    Ok(envelope::created(format!("/macroprocesses/{}", created.id), created))
}

pub async fn get_macroprocess(
    State(state): State<ServerState>,
    Path(macroprocess_id): Path<i32>,
) -> Result<Json<Envelope<macroprocess::Model>>, ApiError> {
    let found = catalog::macroprocesses::get(&state.db, macroprocess_id)
        .await?
        .ok_or_else(|| ApiError::not_found("macroprocess"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_macroprocess(
    State(state): State<ServerState>,
    Path(macroprocess_id): Path<i32>,
    ApiJson(input): ApiJson<catalog::macroprocesses::PatchMacroprocess>,
) -> Result<Json<Envelope<macroprocess::Model>>, ApiError> {
    let updated = catalog::macroprocesses::patch(&state.db, macroprocess_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

// Processes

pub async fn list_processes(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<process::Model>>, ApiError> {
    let (data, paging) = catalog::processes::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_process(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<catalog::processes::CreateProcess>,
) -> Result<Response, ApiError> {
    let created = catalog::processes::create(&state.db, input).await?;
    Ok(envelope::created(format!("/processes/{}", created.id), created))
}

pub async fn get_process(
    State(state): State<ServerState>,
    Path(process_id): Path<i32>,
) -> Result<Json<Envelope<process::Model>>, ApiError> {
    let found = catalog::processes::get(&state.db, process_id)
        .await?
        .ok_or_else(|| ApiError::not_found("process"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_process(
    State(state): State<ServerState>,
    Path(process_id): Path<i32>,
    ApiJson(input): ApiJson<catalog::processes::PatchProcess>,
) -> Result<Json<Envelope<process::Model>>, ApiError> {
    let updated = catalog::processes::patch(&state.db, process_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

// IT services

pub async fn list_it_services(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<it_service::Model>>, ApiError> {
    let (data, paging) = catalog::it_services::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_it_service(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<catalog::it_services::CreateItService>,
) -> Result<Response, ApiError> {
    let created = catalog::it_services::create(&state.db, input).await?;
    Ok(envelope::created(format!("/itServices/{}", created.id), created))
}

pub async fn get_it_service(
    State(state): State<ServerState>,
    Path(it_service_id): Path<i32>,
) -> Result<Json<Envelope<it_service::Model>>, ApiError> {
    let found = catalog::it_services::get(&state.db, it_service_id)
        .await?
        .ok_or_else(|| ApiError::not_found("IT service"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_it_service(
    State(state): State<ServerState>,
    Path(it_service_id): Path<i32>,
    ApiJson(input): ApiJson<catalog::it_services::PatchItService>,
) -> Result<Json<Envelope<it_service::Model>>, ApiError> {
    let updated = catalog::it_services::patch(&state.db, it_service_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

// IT asset categories. Ids are chosen by the client, not the database.

pub async fn list_it_asset_categories(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<it_asset_category::Model>>, ApiError> {
    let (data, paging) = catalog::it_asset_categories::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_it_asset_category(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<catalog::it_asset_categories::CreateItAssetCategory>,
) -> Result<Response, ApiError> {
    let created = catalog::it_asset_categories::create(&state.db, input).await?;
    Ok(envelope::created(format!("/itAssetCategories/{}", created.id), created))
}

pub async fn get_it_asset_category(
    State(state): State<ServerState>,
    Path(category_id): Path<i32>,
) -> Result<Json<Envelope<it_asset_category::Model>>, ApiError> {
    let found = catalog::it_asset_categories::get(&state.db, category_id)
        .await?
        .ok_or_else(|| ApiError::not_found("IT asset category"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_it_asset_category(
    State(state): State<ServerState>,
    Path(category_id): Path<i32>,
    ApiJson(input): ApiJson<catalog::it_asset_categories::PatchItAssetCategory>,
) -> Result<Json<Envelope<it_asset_category::Model>>, ApiError> {
    let updated = catalog::it_asset_categories::patch(&state.db, category_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

// IT assets

pub async fn list_it_assets(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<it_asset::Model>>, ApiError> {
    let (data, paging) = catalog::it_assets::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_it_asset(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<catalog::it_assets::CreateItAsset>,
) -> Result<Response, ApiError> {
    let created = catalog::it_assets::create(&state.db, input).await?;
    Ok(envelope::created(format!("/itAssets/{}", created.id), created))
}

pub async fn get_it_asset(
    State(state): State<ServerState>,
    Path(it_asset_id): Path<i32>,
) -> Result<Json<Envelope<it_asset::Model>>, ApiError> {
    let found = catalog::it_assets::get(&state.db, it_asset_id)
        .await?
        .ok_or_else(|| ApiError::not_found("IT asset"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_it_asset(
    State(state): State<ServerState>,
    Path(it_asset_id): Path<i32>,
    ApiJson(input): ApiJson<catalog::it_assets::PatchItAsset>,
) -> Result<Json<Envelope<it_asset::Model>>, ApiError> {
    let updated = catalog::it_assets::patch(&state.db, it_asset_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}

// Security threats

pub async fn list_security_threats(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<security_threat::Model>>, ApiError> {
    let (data, paging) = catalog::security_threats::list(&state.db, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create_security_threat(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<catalog::security_threats::CreateSecurityThreat>,
) -> Result<Response, ApiError> {
    let created = catalog::security_threats::create(&state.db, input).await?;
    Ok(envelope::created(format!("/securityThreats/{}", created.id), created))
}

pub async fn get_security_threat(
    State(state): State<ServerState>,
    Path(security_threat_id): Path<i32>,
) -> Result<Json<Envelope<security_threat::Model>>, ApiError> {
    let found = catalog::security_threats::get(&state.db, security_threat_id)
        .await?
        .ok_or_else(|| ApiError::not_found("security threat"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn patch_security_threat(
    State(state): State<ServerState>,
    Path(security_threat_id): Path<i32>,
    ApiJson(input): ApiJson<catalog::security_threats::PatchSecurityThreat>,
) -> Result<Json<Envelope<security_threat::Model>>, ApiError> {
    let updated = catalog::security_threats::patch(&state.db, security_threat_id, input).await?;
    Ok(Json(Envelope { data: updated }))
}
