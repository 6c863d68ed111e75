//! Helper functions could be used in api/, front/, ...

use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use std::str::FromStr;

pub async fn setup_sqlite_db_pool(db_host: &str) -> anyhow::Result<SqlitePool> {
    Ok(SqlitePool::connect_with(
        SqliteConnectOptions::from_str(db_host)?
            .create_if_missing(true)
            .pragma("foreign_keys", "ON"),
    )
    .await?)
}

/// Applies the embedded migrations under `migrations/`
pub async fn run_migrations(db_pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(db_pool).await?;
    Ok(())
}
