use std::net::SocketAddr;

use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::build_router;
use server::state::ServerState;

struct TestApp {
    base_url: String,
    db: DatabaseConnection,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Use DATABASE_URL from environment; if not present, skip tests gracefully
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env.test or env var.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }

    let state = ServerState { db: db.clone() };
    let app = build_router(CorsLayer::very_permissive(), state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, db })
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}

fn id_of(body: &Value) -> i32 {
    body["data"]["id"].as_i64().expect("data.id") as i32
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_error_contract() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = reqwest::Client::new();

    // Unknown resources answer with the single-key error object.
    let res = c
        .get(format!("{}/organizations/0", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "organization not found");

    // Malformed JSON becomes a field-error list, not a plain-text rejection.
    let res = c
        .post(format!("{}/departments", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"][0]["code"], "INVALID_VALUE_TYPE");

    // Missing mandatory field.
    let res = c
        .post(format!("{}/departments", app.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"][0]["code"], "FIELD_CANNOT_BE_NULL");
    assert_eq!(body["errors"][0]["fieldName"], "name");

    // Duplicate name.
    let name = unique("dept");
    let res = c
        .post(format!("{}/departments", app.base_url))
        .json(&json!({ "name": name }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let department_id = id_of(&created);

    let res = c
        .post(format!("{}/departments", app.base_url))
        .json(&json!({ "name": name }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"][0]["code"], "FIELD_VALUE_ALREADY_EXISTS");

    // Empty patch body.
    let res = c
        .patch(format!("{}/departments/{}", app.base_url, department_id))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"][0]["code"], "NO_CONTENT");
    assert_eq!(body["errors"][0]["message"], "No content to apply");

    service::catalog::departments::delete(&app.db, department_id).await?;
    Ok(())
}

#[tokio::test]
async fn e2e_risk_mapping_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = reqwest::Client::new();

    // Catalog entries used by the organization below.
    let department_name = unique("dept");
    let res = c
        .post(format!("{}/departments", app.base_url))
        .json(&json!({ "name": department_name }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let department_id = id_of(&res.json::<Value>().await?);
    assert_eq!(
        location.as_deref(),
        Some(format!("/departments/{}", department_id).as_str())
    );

    let res = c
        .get(format!("{}/departments?recordsPerPage=5", app.base_url))
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["paging"]["recordsPerPage"], 5);
    assert_eq!(body["paging"]["currentPage"], 1);
    assert!(body["paging"]["totalRecords"].as_u64().unwrap() >= 1);

    let macroprocess_id = {
        let res = c
            .post(format!("{}/macroprocesses", app.base_url))
            .json(&json!({ "name": unique("macro") }))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
        id_of(&res.json::<Value>().await?)
    };
    let process_id = {
        let res = c
            .post(format!("{}/processes", app.base_url))
            .json(&json!({ "name": unique("proc") }))
            .send()
            .await?;
        id_of(&res.json::<Value>().await?)
    };
    let it_service_id = {
        let res = c
            .post(format!("{}/itServices", app.base_url))
            .json(&json!({ "name": unique("svc") }))
            .send()
            .await?;
        id_of(&res.json::<Value>().await?)
    };
    let category_id = (Uuid::new_v4().as_u128() % 900_000_000) as i32 + 1_000_000;
    let res = c
        .post(format!("{}/itAssetCategories", app.base_url))
        .json(&json!({ "id": category_id, "name": unique("cat") }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let asset_name = unique("asset");
    let it_asset_id = {
        let res = c
            .post(format!("{}/itAssets", app.base_url))
            .json(&json!({ "name": asset_name, "categoryId": category_id }))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
        id_of(&res.json::<Value>().await?)
    };
    let threat_name = unique("threat");
    let security_threat_id = {
        let res = c
            .post(format!("{}/securityThreats", app.base_url))
            .json(&json!({ "name": threat_name }))
            .send()
            .await?;
        id_of(&res.json::<Value>().await?)
    };

    // The organization and its structure, everything rated 5.
    let tax_id = format!("{}", Uuid::new_v4().as_u128() % 10_000_000_000_000_000);
    let res = c
        .post(format!("{}/organizations", app.base_url))
        .json(&json!({ "taxId": tax_id, "legalName": unique("org") }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let organization_code = id_of(&res.json::<Value>().await?);

    let res = c
        .post(format!(
            "{}/organizations/{}/departments",
            app.base_url, organization_code
        ))
        .json(&json!({ "departmentId": department_id }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["departmentName"], department_name);

    let macroprocess_instance_id = {
        let res = c
            .post(format!(
                "{}/organizations/{}/macroprocesses",
                app.base_url, organization_code
            ))
            .json(&json!({ "departmentId": department_id, "macroprocessId": macroprocess_id }))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
        id_of(&res.json::<Value>().await?)
    };
    let process_instance_id = {
        let res = c
            .post(format!(
                "{}/organizations/{}/processes",
                app.base_url, organization_code
            ))
            .json(&json!({
                "macroprocessInstanceId": macroprocess_instance_id,
                "processId": process_id,
                "relevanceLevelId": 5
            }))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
        id_of(&res.json::<Value>().await?)
    };
    let service_instance_id = {
        let res = c
            .post(format!(
                "{}/organizations/{}/itServices",
                app.base_url, organization_code
            ))
            .json(&json!({
                "processInstanceId": process_instance_id,
                "itServiceId": it_service_id,
                "relevanceLevelId": 5
            }))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
        id_of(&res.json::<Value>().await?)
    };
    let asset_instance_id = {
        let res = c
            .post(format!(
                "{}/organizations/{}/itAssets",
                app.base_url, organization_code
            ))
            .json(&json!({ "itAssetId": it_asset_id, "relevanceLevelId": 5 }))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
        id_of(&res.json::<Value>().await?)
    };

    let res = c
        .post(format!(
            "{}/organizations/{}/itServices/{}/itAssets",
            app.base_url, organization_code, service_instance_id
        ))
        .json(&json!({ "itAssetInstanceId": asset_instance_id, "relevanceLevelId": 5 }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["itAssetName"], asset_name);

    let res = c
        .post(format!(
            "{}/organizations/{}/securityThreats",
            app.base_url, organization_code
        ))
        .json(&json!({ "securityThreatId": security_threat_id, "threatLevelId": 5 }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c
        .post(format!(
            "{}/organizations/{}/itAssets/{}/vulnerabilities",
            app.base_url, organization_code, asset_instance_id
        ))
        .json(&json!({ "description": "weak backups", "vulnerabilityLevelId": 5 }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    // Run the analysis. One fully rated combination, everything at 5/5.
    let res = c
        .post(format!(
            "{}/organizations/{}/analyses",
            app.base_url, organization_code
        ))
        .json(&json!({ "description": "first run" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = res.json::<Value>().await?;
    let analysis_id = id_of(&body);
    assert_eq!(
        location.as_deref(),
        Some(
            format!(
                "/organizations/{}/analyses/{}",
                organization_code, analysis_id
            )
            .as_str()
        )
    );
    assert_eq!(body["data"]["totalProcessedItems"], 1);
    assert_eq!(body["data"]["organizationId"], organization_code);

    let res = c
        .get(format!(
            "{}/organizations/{}/analyses/{}/details",
            app.base_url, organization_code, analysis_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let details = res.json::<Value>().await?;
    assert_eq!(details["data"].as_array().map(Vec::len), Some(1));
    let row = &details["data"][0];
    assert_eq!(row["departmentName"], department_name);
    assert_eq!(row["itAssetName"], asset_name);
    assert_eq!(row["securityThreatName"], threat_name);
    assert_eq!(row["impact"], 1.0);
    assert_eq!(row["probability"], 1.0);
    assert_eq!(row["risk"], 1.0);

    // An unrated vulnerability does not add combinations.
    let res = c
        .post(format!(
            "{}/organizations/{}/itAssets/{}/vulnerabilities",
            app.base_url, organization_code, asset_instance_id
        ))
        .json(&json!({ "description": "not yet rated" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c
        .post(format!(
            "{}/organizations/{}/analyses",
            app.base_url, organization_code
        ))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let second_analysis_id = id_of(&body);
    assert_eq!(body["data"]["totalProcessedItems"], 1);

    // List is newest first.
    let res = c
        .get(format!(
            "{}/organizations/{}/analyses",
            app.base_url, organization_code
        ))
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"][0]["id"], second_analysis_id);
    assert_eq!(body["data"][1]["id"], analysis_id);

    // Description is the only patchable field.
    let res = c
        .patch(format!(
            "{}/organizations/{}/analyses/{}",
            app.base_url, organization_code, analysis_id
        ))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"][0]["code"], "NO_CONTENT");

    let res = c
        .patch(format!(
            "{}/organizations/{}/analyses/{}",
            app.base_url, organization_code, analysis_id
        ))
        .json(&json!({ "description": "first run, reviewed" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["description"], "first run, reviewed");

    // Analyses of one organization are invisible through another.
    let other_tax = format!("{}", Uuid::new_v4().as_u128() % 10_000_000_000_000_000);
    let res = c
        .post(format!("{}/organizations", app.base_url))
        .json(&json!({ "taxId": other_tax, "legalName": unique("other") }))
        .send()
        .await?;
    let other_code = id_of(&res.json::<Value>().await?);

    let res = c
        .get(format!(
            "{}/organizations/{}/analyses/{}",
            app.base_url, other_code, analysis_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c
        .get(format!(
            "{}/organizations/{}/analyses",
            app.base_url, other_code
        ))
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["paging"]["totalRecords"], 0);

    // Deleting the organization removes the scoped structure and analyses.
    let res = c
        .delete(format!(
            "{}/organizations/{}",
            app.base_url, organization_code
        ))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c
        .get(format!(
            "{}/organizations/{}",
            app.base_url, organization_code
        ))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c
        .delete(format!("{}/organizations/{}", app.base_url, other_code))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    // Catalog rows are shared, so clean them through the service layer.
    service::catalog::it_assets::delete(&app.db, it_asset_id).await?;
    service::catalog::it_asset_categories::delete(&app.db, category_id).await?;
    service::catalog::departments::delete(&app.db, department_id).await?;
    service::catalog::macroprocesses::delete(&app.db, macroprocess_id).await?;
    service::catalog::processes::delete(&app.db, process_id).await?;
    service::catalog::it_services::delete(&app.db, it_service_id).await?;
    service::catalog::security_threats::delete(&app.db, security_threat_id).await?;
    Ok(())
}

#[tokio::test]
async fn e2e_user_management_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = reqwest::Client::new();

    let role_name = unique("role");
    let res = c
        .post(format!("{}/management/roles", app.base_url))
        .json(&json!({ "name": role_name }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let role_id = id_of(&res.json::<Value>().await?);

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let res = c
        .post(format!("{}/management/users", app.base_url))
        .json(&json!({
            "fullName": "Test User",
            "email": email,
            "password": "long enough secret",
            "roles": [{ "id": role_id }]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let user_id = id_of(&body);
    assert_eq!(body["data"]["roles"][0]["name"], role_name);
    // Password material never leaves the server.
    assert!(body["data"].get("hashedPassword").is_none());
    assert!(body["data"].get("password").is_none());

    // Same email again.
    let res = c
        .post(format!("{}/management/users", app.base_url))
        .json(&json!({
            "fullName": "Other User",
            "email": email,
            "password": "another long secret"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"][0]["code"], "FIELD_VALUE_ALREADY_EXISTS");
    assert_eq!(body["errors"][0]["fieldName"], "email");

    // Password length is enforced in characters.
    let res = c
        .post(format!("{}/management/users", app.base_url))
        .json(&json!({
            "fullName": "Short Pass",
            "email": format!("user_{}@example.com", Uuid::new_v4()),
            "password": "short"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"][0]["code"], "FIELD_MIN_LENGTH_NOT_MET");

    // Block and unblock.
    let res = c
        .patch(format!("{}/management/users/{}", app.base_url, user_id))
        .json(&json!({ "isBlocked": true }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["data"]["blockedOn"].is_string());

    let res = c
        .patch(format!("{}/management/users/{}", app.base_url, user_id))
        .json(&json!({ "isBlocked": false }))
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert!(body["data"]["blockedOn"].is_null());

    let res = c
        .get(format!("{}/management/users", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["paging"]["totalRecords"].as_u64().unwrap() >= 1);

    service::management::users::delete(&app.db, user_id).await?;
    service::management::roles::delete(&app.db, role_id).await?;
    Ok(())
}
