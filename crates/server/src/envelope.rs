use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use common::types::Paging;
use service::pagination::PageParams;

/// Single-resource response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: T,
}

/// Collection response body with paging metadata.
#[derive(Debug, Serialize)]
pub struct PagedEnvelope<T: Serialize> {
    pub data: Vec<T>,
    pub paging: Paging,
}

/// Query string accepted by every collection endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page to fetch.
    pub page: Option<u64>,
    /// Page size, capped server-side.
    pub records_per_page: Option<u64>,
}

impl From<PageQuery> for PageParams {
    fn from(q: PageQuery) -> Self {
        let defaults = PageParams::default();
        PageParams {
            page: q.page.unwrap_or(defaults.page),
            records_per_page: q.records_per_page.unwrap_or(defaults.records_per_page),
        }
    }
}

/// 201 with a Location header pointing at the new resource.
pub fn created<T: Serialize>(location: String, data: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(Envelope { data }),
    )
        .into_response()
}
