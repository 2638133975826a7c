//! The six-table content schema and schema-only template files.

use super::connection::open_database;
use sqlx::sqlite::SqlitePool;
use std::path::Path;
use tracing::info;

/// Schema of the content database, one statement per `;`.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables cleared and reloaded on every run, children before parents.
pub const CONTENT_TABLES: [&str; 6] = [
    "evangelium_tags",
    "evangelium",
    "viacrucis",
    "pontifex",
    "saints",
    "prayers",
];

/// Create any missing content tables.
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_SQL.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

/// Write a schema-only template database at `path`.
pub async fn create_template(path: &Path) -> Result<(), sqlx::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = open_database(path, true).await?;
    apply_schema(&pool).await?;
    pool.close().await;

    info!("Template database written to {}", path.display());
    Ok(())
}
