use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use service::org::departments::{self, AttachDepartment, OrgDepartmentRow};

use crate::envelope::{self, Envelope, PagedEnvelope, PageQuery};
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn list(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PagedEnvelope<OrgDepartmentRow>>, ApiError> {
    let (data, paging) = departments::list(&state.db, organization_code, page.into()).await?;
    Ok(Json(PagedEnvelope { data, paging }))
}

pub async fn create(
    State(state): State<ServerState>,
    Path(organization_code): Path<i32>,
    ApiJson(input): ApiJson<AttachDepartment>,
) -> Result<Response, ApiError> {
    let created = departments::create(&state.db, organization_code, input).await?;
    Ok(envelope::created(
        format!(
            "/organizations/{}/departments/{}",
            organization_code, created.department_id
        ),
        created,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path((organization_code, department_id)): Path<(i32, i32)>,
) -> Result<Json<Envelope<OrgDepartmentRow>>, ApiError> {
    let found = departments::get(&state.db, organization_code, department_id)
        .await?
        .ok_or_else(|| ApiError::not_found("department"))?;
    Ok(Json(Envelope { data: found }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path((organization_code, department_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    if departments::delete(&state.db, organization_code, department_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("department"))
    }
}
