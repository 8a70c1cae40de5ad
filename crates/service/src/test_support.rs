#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Connection for database-backed tests, or `None` when they should be skipped
/// (`SKIP_DB_TESTS` set, no `DATABASE_URL`, or the database is unreachable).
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip: database tests disabled or DATABASE_URL missing");
        return None;
    }

    let test_config = || {
        let mut cfg = DatabaseConfig::from_file().unwrap_or_else(DatabaseConfig::from_env);
        cfg.max_connections = cfg.max_connections.max(10);
        cfg.min_connections = cfg.min_connections.min(1);
        cfg.acquire_timeout = std::time::Duration::from_secs(10);
        cfg
    };

    // Run migrations exactly once, with a throwaway connection
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let Ok(db) = connect_with_config(&test_config()).await else { return false };
            let ok = migration::Migrator::up(&db, None).await.is_ok();
            drop(db);
            ok
        })
        .await;
    if !migrated {
        eprintln!("skip: cannot connect or migrate test database");
        return None;
    }

    // Return a fresh connection for the current test's runtime
    connect_with_config(&test_config()).await.ok()
}
