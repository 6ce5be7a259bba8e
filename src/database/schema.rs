//! Database schema initialization
//!
//! Creates the base tables on first run. Uses SQLite with WAL mode for
//! better concurrency and crash safety. Data-level migrations (backfills,
//! normalization passes) are handled separately by the migration manager.

use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Initialize the database schema
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Initializing database schema");

    // Enable WAL mode for better performance and crash safety
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            id TEXT PRIMARY KEY,
            caught_at TEXT NOT NULL,
            location TEXT NOT NULL,
            species TEXT NOT NULL,
            size_cm REAL,
            weight_g REAL,
            water_temp_c REAL,
            latitude REAL,
            longitude REAL,
            gps_accuracy REAL,
            weather TEXT,
            notes TEXT,
            photo_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id TEXT PRIMARY KEY,
            blob_hash TEXT NOT NULL,
            mime_type TEXT NOT NULL,
            size INTEGER NOT NULL,
            uploaded_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            value_type TEXT NOT NULL DEFAULT 'string',
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_caught_at ON records(caught_at)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_species ON records(species)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_photo_id ON records(photo_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database initialization complete");
    Ok(())
}
