use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// One entry of a 422 response body.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrorDoc {
    /// Machine-readable code, e.g. FIELD_CANNOT_BE_NULL.
    pub code: String,
    pub message: String,
    pub field_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationDoc {
    pub tax_id: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchOrganizationDoc {
    pub tax_id: Option<String>,
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnalysisDoc {
    pub description: Option<String>,
    /// When the analysis was performed. Defaults to now; never in the future.
    pub analysis_performed_on: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::organizations::list,
        crate::routes::organizations::create,
        crate::routes::organizations::get,
        crate::routes::organizations::patch,
        crate::routes::organizations::delete,
        crate::routes::analyses::create,
        crate::routes::analyses::list,
        crate::routes::analyses::get,
        crate::routes::analyses::patch,
        crate::routes::analyses::list_details,
    ),
    components(
        schemas(
            HealthResponse,
            FieldErrorDoc,
            CreateOrganizationDoc,
            PatchOrganizationDoc,
            CreateAnalysisDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "organizations"),
        (name = "analyses")
    )
)]
pub struct ApiDoc;
