//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to the shell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A logged catch
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CatchRecord {
    pub id: String,
    /// When the fish was caught
    pub caught_at: DateTime<Utc>,
    pub location: String,
    pub species: String,
    pub size_cm: Option<f64>,
    pub weight_g: Option<f64>,
    pub water_temp_c: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub gps_accuracy: Option<f64>,
    /// Free-form weather condition label ("sunny", "overcast", ...)
    pub weather: Option<String>,
    pub notes: Option<String>,
    /// Reference to a stored photo
    pub photo_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate record submitted by the user, before validation.
///
/// Every field is optional; the validation engine decides which absences
/// are errors. This is the shape the shell sends for both create and the
/// merged state of an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordDraft {
    pub caught_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub species: Option<String>,
    pub size_cm: Option<f64>,
    pub weight_g: Option<f64>,
    pub water_temp_c: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub gps_accuracy: Option<f64>,
    pub weather: Option<String>,
    pub notes: Option<String>,
    pub photo_id: Option<String>,
}

impl RecordDraft {
    /// Draft carrying the current state of a stored record, used to
    /// re-validate an update after merging the patch.
    pub fn from_record(record: &CatchRecord) -> Self {
        Self {
            caught_at: Some(record.caught_at),
            location: Some(record.location.clone()),
            species: Some(record.species.clone()),
            size_cm: record.size_cm,
            weight_g: record.weight_g,
            water_temp_c: record.water_temp_c,
            latitude: record.latitude,
            longitude: record.longitude,
            gps_accuracy: record.gps_accuracy,
            weather: record.weather.clone(),
            notes: record.notes.clone(),
            photo_id: record.photo_id.clone(),
        }
    }
}

/// Update record request; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecordRequest {
    pub caught_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub species: Option<String>,
    pub size_cm: Option<f64>,
    pub weight_g: Option<f64>,
    pub water_temp_c: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub gps_accuracy: Option<f64>,
    pub weather: Option<String>,
    pub notes: Option<String>,
    pub photo_id: Option<String>,
}

/// Stored photo metadata; the bytes live in the blob store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: String,
    /// SHA-256 hash of the photo content, key into the blob store
    pub blob_hash: String,
    pub mime_type: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Candidate photo upload, before validation
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Application setting row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub updated_at: DateTime<Utc>,
}

/// Persisted data-format version, stored as JSON under a fixed settings key.
///
/// `schema_version` only ever grows; `migrations_applied` holds the ids of
/// every applied data migration in application order and shrinks by exactly
/// one entry on a successful rollback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataVersion {
    pub version: String,
    pub schema_version: i64,
    pub migrations_applied: Vec<String>,
    pub last_migration_date: Option<DateTime<Utc>>,
}

impl Default for DataVersion {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            schema_version: 0,
            migrations_applied: Vec::new(),
            last_migration_date: None,
        }
    }
}
