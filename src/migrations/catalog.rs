//! Built-in migration catalog
//!
//! The data migrations this app has shipped, in the order they were
//! introduced. New migrations are appended here and the target schema
//! version in `config` is bumped alongside.

use super::registry::{DataMigration, MigrationRegistry};
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;
use std::sync::Arc;

/// Registry of every shipped migration, in introduction order
pub fn builtin_registry() -> Result<MigrationRegistry> {
    MigrationRegistry::new(vec![
        Arc::new(TrimTextFields),
        Arc::new(WeatherUnknownBackfill),
        Arc::new(MeasurementUnitSetting),
    ])
}

/// Early releases stored location/species/notes exactly as typed,
/// including stray whitespace, which broke grouping in the stats views.
struct TrimTextFields;

#[async_trait]
impl DataMigration for TrimTextFields {
    fn id(&self) -> &'static str {
        "001_trim_text_fields"
    }

    fn version(&self) -> &'static str {
        "1.1.0"
    }

    fn description(&self) -> &'static str {
        "Trim whitespace from stored location, species, and notes"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE records SET
                location = TRIM(location),
                species = TRIM(species),
                notes = TRIM(notes)
            "#,
        )
        .execute(conn)
        .await?;

        Ok(())
    }

    // No down: the original whitespace is gone for good.
}

/// Stats treat blank weather as the literal category "unknown"; this
/// bakes that into the stored rows so exports agree with the app.
struct WeatherUnknownBackfill;

#[async_trait]
impl DataMigration for WeatherUnknownBackfill {
    fn id(&self) -> &'static str {
        "002_weather_unknown_backfill"
    }

    fn version(&self) -> &'static str {
        "1.2.0"
    }

    fn description(&self) -> &'static str {
        "Backfill blank weather fields with 'unknown'"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            "UPDATE records SET weather = 'unknown' WHERE weather IS NULL OR TRIM(weather) = ''",
        )
        .execute(conn)
        .await?;

        Ok(())
    }

    // No down: rows that already said "unknown" are indistinguishable
    // from backfilled ones.
}

/// Seeds the measurement-unit setting older installs never wrote.
struct MeasurementUnitSetting;

#[async_trait]
impl DataMigration for MeasurementUnitSetting {
    fn id(&self) -> &'static str {
        "003_measurement_unit_setting"
    }

    fn version(&self) -> &'static str {
        "1.3.0"
    }

    fn description(&self) -> &'static str {
        "Seed the default measurement unit setting"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, value_type, updated_at)
            VALUES ('measurement_units', 'metric', 'string', ?)
            ON CONFLICT(key) DO NOTHING
            "#,
        )
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(())
    }

    fn supports_rollback(&self) -> bool {
        true
    }

    async fn down(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query("DELETE FROM settings WHERE key = 'measurement_units'")
            .execute(conn)
            .await?;

        Ok(())
    }
}
