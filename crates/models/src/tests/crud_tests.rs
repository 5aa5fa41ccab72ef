use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    department, it_asset, it_asset_category, it_service, macroprocess, organization,
    organization_department, organization_it_asset, organization_it_asset_vulnerability,
    organization_it_service, organization_it_service_it_asset, organization_macroprocess,
    organization_process, organization_security_threat, process, security_threat,
};

async fn test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match crate::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}

#[tokio::test]
async fn department_catalog_crud() -> Result<(), anyhow::Error> {
    let Some(db) = test_db().await else { return Ok(()) };

    let now = Utc::now();
    let name = unique("dept");
    let created = department::ActiveModel {
        name: Set(name.clone()),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let found = department::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.as_ref().map(|m| m.name.as_str()), Some(name.as_str()));

    let mut am: department::ActiveModel = found.unwrap().into();
    let renamed = unique("dept_renamed");
    am.name = Set(renamed.clone());
    am.last_modified_on = Set(Utc::now().into());
    let updated = am.update(&db).await?;
    assert_eq!(updated.name, renamed);

    department::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(department::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn organization_chain_inserts_and_cascades() -> Result<(), anyhow::Error> {
    let Some(db) = test_db().await else { return Ok(()) };
    let now = Utc::now();

    // Catalog rows the chain hangs off.
    let dept = department::ActiveModel {
        name: Set(unique("dept")),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let macro_ = macroprocess::ActiveModel {
        name: Set(unique("macro")),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let proc = process::ActiveModel {
        name: Set(unique("proc")),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let svc = it_service::ActiveModel {
        name: Set(unique("svc")),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let category_id = (Uuid::new_v4().as_u128() % 1_000_000) as i32 + 1_000;
    let category = it_asset_category::ActiveModel {
        id: Set(category_id),
        name: Set(unique("category")),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
    }
    .insert(&db)
    .await?;
    let asset = it_asset::ActiveModel {
        category_id: Set(category.id),
        name: Set(unique("asset")),
        description: Set(None),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let threat = security_threat::ActiveModel {
        name: Set(unique("threat")),
        description: Set(None),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let tax_id = Uuid::new_v4().simple().to_string()[..16].to_string();
    let org = organization::ActiveModel {
        tax_id: Set(tax_id),
        legal_name: Set(unique("org")),
        trade_name: Set(None),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    // Instance chain, all rated 5.
    organization_department::ActiveModel {
        organization_id: Set(org.id),
        department_id: Set(dept.id),
        created_on: Set(now.into()),
    }
    .insert(&db)
    .await?;
    let macro_instance = organization_macroprocess::ActiveModel {
        organization_id: Set(org.id),
        department_id: Set(dept.id),
        macroprocess_id: Set(macro_.id),
        created_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let proc_instance = organization_process::ActiveModel {
        organization_id: Set(org.id),
        macroprocess_instance_id: Set(macro_instance.id),
        process_id: Set(proc.id),
        relevance_level_id: Set(Some(5)),
        created_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let svc_instance = organization_it_service::ActiveModel {
        organization_id: Set(org.id),
        process_instance_id: Set(proc_instance.id),
        it_service_id: Set(svc.id),
        relevance_level_id: Set(Some(5)),
        created_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let asset_instance = organization_it_asset::ActiveModel {
        organization_id: Set(org.id),
        it_asset_id: Set(asset.id),
        relevance_level_id: Set(Some(5)),
        created_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    organization_it_service_it_asset::ActiveModel {
        it_service_instance_id: Set(svc_instance.id),
        it_asset_instance_id: Set(asset_instance.id),
        relevance_level_id: Set(Some(5)),
        created_on: Set(now.into()),
    }
    .insert(&db)
    .await?;
    organization_security_threat::ActiveModel {
        organization_id: Set(org.id),
        security_threat_id: Set(threat.id),
        threat_level_id: Set(Some(5)),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    organization_it_asset_vulnerability::ActiveModel {
        it_asset_instance_id: Set(asset_instance.id),
        description: Set(Some("unpatched".into())),
        vulnerability_level_id: Set(Some(5)),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    // Composite key lookups work.
    let link = organization_it_service_it_asset::Entity::find_by_id((svc_instance.id, asset_instance.id))
        .one(&db)
        .await?;
    assert_eq!(link.and_then(|l| l.relevance_level_id), Some(5));
    let attach = organization_department::Entity::find_by_id((org.id, dept.id)).one(&db).await?;
    assert!(attach.is_some());

    // Deleting the organization must cascade through the whole chain.
    organization::Entity::delete_by_id(org.id).exec(&db).await?;
    assert!(organization_department::Entity::find_by_id((org.id, dept.id)).one(&db).await?.is_none());
    assert!(organization_process::Entity::find_by_id(proc_instance.id).one(&db).await?.is_none());
    assert!(
        organization_it_service_it_asset::Entity::find_by_id((svc_instance.id, asset_instance.id))
            .one(&db)
            .await?
            .is_none()
    );

    // Catalog rows are untouched by the cascade.
    assert!(department::Entity::find_by_id(dept.id).one(&db).await?.is_some());

    security_threat::Entity::delete_by_id(threat.id).exec(&db).await?;
    it_asset::Entity::delete_by_id(asset.id).exec(&db).await?;
    it_asset_category::Entity::delete_by_id(category.id).exec(&db).await?;
    it_service::Entity::delete_by_id(svc.id).exec(&db).await?;
    process::Entity::delete_by_id(proc.id).exec(&db).await?;
    macroprocess::Entity::delete_by_id(macro_.id).exec(&db).await?;
    department::Entity::delete_by_id(dept.id).exec(&db).await?;
    Ok(())
}
