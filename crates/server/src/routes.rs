use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod analyses;
pub mod catalog;
pub mod management;
pub mod org_departments;
pub mod org_it_assets;
pub mod org_it_services;
pub mod org_macroprocesses;
pub mod org_processes;
pub mod org_security_threats;
pub mod org_service_assets;
pub mod org_vulnerabilities;
pub mod organizations;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: catalogs, organizations with their
/// scoped sub-resources, analyses, user management and the Swagger UI.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let catalogs = Router::new()
        .route(
            "/departments",
            get(catalog::list_departments).post(catalog::create_department),
        )
        .route(
            "/departments/:department_id",
            get(catalog::get_department).patch(catalog::patch_department),
        )
        .route(
            "/macroprocesses",
            get(catalog::list_macroprocesses).post(catalog::create_macroprocess),
        )
        .route(
            "/macroprocesses/:macroprocess_id",
            get(catalog::get_macroprocess).patch(catalog::patch_macroprocess),
        )
        .route(
            "/processes",
            get(catalog::list_processes).post(catalog::create_process),
        )
        .route(
            "/processes/:process_id",
            get(catalog::get_process).patch(catalog::patch_process),
        )
        .route(
            "/itServices",
            get(catalog::list_it_services).post(catalog::create_it_service),
        )
        .route(
            "/itServices/:it_service_id",
            get(catalog::get_it_service).patch(catalog::patch_it_service),
        )
        .route(
            "/itAssetCategories",
            get(catalog::list_it_asset_categories).post(catalog::create_it_asset_category),
        )
        .route(
            "/itAssetCategories/:category_id",
            get(catalog::get_it_asset_category).patch(catalog::patch_it_asset_category),
        )
        .route(
            "/itAssets",
            get(catalog::list_it_assets).post(catalog::create_it_asset),
        )
        .route(
            "/itAssets/:it_asset_id",
            get(catalog::get_it_asset).patch(catalog::patch_it_asset),
        )
        .route(
            "/securityThreats",
            get(catalog::list_security_threats).post(catalog::create_security_threat),
        )
        .route(
            "/securityThreats/:security_threat_id",
            get(catalog::get_security_threat).patch(catalog::patch_security_threat),
        );

    let orgs = Router::new()
        .route(
            "/organizations",
            get(organizations::list).post(organizations::create),
        )
        .route(
            "/organizations/:organization_code",
            get(organizations::get)
                .patch(organizations::patch)
                .delete(organizations::delete),
        )
        .route(
            "/organizations/:organization_code/departments",
            get(org_departments::list).post(org_departments::create),
        )
        .route(
            "/organizations/:organization_code/departments/:department_id",
            get(org_departments::get).delete(org_departments::delete),
        )
        .route(
            "/organizations/:organization_code/macroprocesses",
            get(org_macroprocesses::list).post(org_macroprocesses::create),
        )
        .route(
            "/organizations/:organization_code/macroprocesses/:macroprocess_instance_id",
            get(org_macroprocesses::get).delete(org_macroprocesses::delete),
        )
        .route(
            "/organizations/:organization_code/processes",
            get(org_processes::list).post(org_processes::create),
        )
        .route(
            "/organizations/:organization_code/processes/:process_instance_id",
            get(org_processes::get)
                .patch(org_processes::patch)
                .delete(org_processes::delete),
        )
        .route(
            "/organizations/:organization_code/itServices",
            get(org_it_services::list).post(org_it_services::create),
        )
        .route(
            "/organizations/:organization_code/itServices/:service_instance_id",
            get(org_it_services::get)
                .patch(org_it_services::patch)
                .delete(org_it_services::delete),
        )
        .route(
            "/organizations/:organization_code/itServices/:service_instance_id/itAssets",
            get(org_service_assets::list).post(org_service_assets::create),
        )
        .route(
            "/organizations/:organization_code/itServices/:service_instance_id/itAssets/:asset_instance_id",
            get(org_service_assets::get)
                .patch(org_service_assets::patch)
                .delete(org_service_assets::delete),
        )
        .route(
            "/organizations/:organization_code/itAssets",
            get(org_it_assets::list).post(org_it_assets::create),
        )
        .route(
            "/organizations/:organization_code/itAssets/:asset_instance_id",
            get(org_it_assets::get)
                .patch(org_it_assets::patch)
                .delete(org_it_assets::delete),
        )
        .route(
            "/organizations/:organization_code/itAssets/:asset_instance_id/vulnerabilities",
            get(org_vulnerabilities::list).post(org_vulnerabilities::create),
        )
        .route(
            "/organizations/:organization_code/itAssets/:asset_instance_id/vulnerabilities/:vulnerability_id",
            get(org_vulnerabilities::get)
                .patch(org_vulnerabilities::patch)
                .delete(org_vulnerabilities::delete),
        )
        .route(
            "/organizations/:organization_code/securityThreats",
            get(org_security_threats::list).post(org_security_threats::create),
        )
        .route(
            "/organizations/:organization_code/securityThreats/:security_threat_id",
            get(org_security_threats::get)
                .patch(org_security_threats::patch)
                .delete(org_security_threats::delete),
        )
        .route(
            "/organizations/:organization_code/analyses",
            get(analyses::list).post(analyses::create),
        )
        .route(
            "/organizations/:organization_code/analyses/:analysis_id",
            get(analyses::get).patch(analyses::patch),
        )
        .route(
            "/organizations/:organization_code/analyses/:analysis_id/details",
            get(analyses::list_details),
        );

    let management_routes = Router::new()
        .route(
            "/management/users",
            get(management::list_users).post(management::create_user),
        )
        .route(
            "/management/users/:user_id",
            get(management::get_user).patch(management::patch_user),
        )
        .route(
            "/management/roles",
            get(management::list_roles).post(management::create_role),
        )
        .route(
            "/management/roles/:role_id",
            get(management::get_role).patch(management::patch_role),
        );

    Router::new()
        .route("/health", get(health))
        .merge(catalogs)
        .merge(orgs)
        .merge(management_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
