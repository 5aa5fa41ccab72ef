#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Run migrations only once across the entire test process.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Connection for database-backed tests, or `None` when no database is
/// reachable (or SKIP_DB_TESTS is set) so those tests skip instead of fail.
/// Each test gets a fresh connection for its own runtime.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }

    let migrated = MIGRATED
        .get_or_init(|| async {
            let db = match models::db::connect().await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skipping db tests: cannot connect: {e}");
                    return false;
                }
            };
            if let Err(e) = migration::Migrator::up(&db, None).await {
                eprintln!("skipping db tests: migrate up failed: {e}");
                return false;
            }
            true
        })
        .await;
    if !migrated {
        return None;
    }

    match models::db::connect().await {
        Ok(db) => Some(db),
        Err(e) => {
            eprintln!("skipping db test: cannot connect: {e}");
            None
        }
    }
}
