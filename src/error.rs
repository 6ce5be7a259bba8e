//! Error types for the Catchlog core
//!
//! All errors use thiserror for structured error handling.
//! Every expected failure mode carries a stable machine-readable code
//! so the calling shell can branch without parsing messages.

use crate::validation::DataValidationResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Photo not found: {0}")]
    PhotoNotFound(String),

    #[error("Blob store error: {0}")]
    BlobStore(String),

    #[error("Record validation failed")]
    Validation(DataValidationResult),

    #[error("Failed to read data version: {0}")]
    VersionGet(String),

    #[error("Failed to update data version: {0}")]
    VersionUpdate(String),

    #[error("Schema compatibility check failed: {0}")]
    SchemaCompatibility(String),

    #[error("Migration run failed: {0}")]
    MigrationFailed(String),

    #[error("Migration '{id}' failed: {message}")]
    MigrationExecution { id: String, message: String },

    #[error("Migration not found: {0}")]
    MigrationNotFound(String),

    #[error("Migration '{0}' does not support rollback")]
    RollbackNotSupported(String),

    #[error("Rollback of migration '{id}' failed: {message}")]
    RollbackFailed { id: String, message: String },

    #[error("Integrity check failed: {0}")]
    IntegrityCheckFailed(String),

    #[error("Orphaned photo scan failed: {0}")]
    OrphanScanFailed(String),

    #[error("Orphaned photo cleanup failed: {0}")]
    CleanupFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Stable error code for the calling shell.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "STORAGE_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::RecordNotFound(_) => "RECORD_NOT_FOUND",
            AppError::PhotoNotFound(_) => "PHOTO_NOT_FOUND",
            AppError::BlobStore(_) => "BLOB_STORE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::VersionGet(_) => "VERSION_GET_FAILED",
            AppError::VersionUpdate(_) => "VERSION_UPDATE_FAILED",
            AppError::SchemaCompatibility(_) => "SCHEMA_COMPATIBILITY_CHECK_FAILED",
            AppError::MigrationFailed(_) => "MIGRATION_FAILED",
            AppError::MigrationExecution { .. } => "MIGRATION_EXECUTION_FAILED",
            AppError::MigrationNotFound(_) => "MIGRATION_NOT_FOUND",
            AppError::RollbackNotSupported(_) => "ROLLBACK_NOT_SUPPORTED",
            AppError::RollbackFailed { .. } => "ROLLBACK_FAILED",
            AppError::IntegrityCheckFailed(_) => "INTEGRITY_CHECK_FAILED",
            AppError::OrphanScanFailed(_) => "ORPHANED_PHOTOS_CHECK_FAILED",
            AppError::CleanupFailed(_) => "CLEANUP_FAILED",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Generic(_) => "INTERNAL_ERROR",
        }
    }

    /// The validation result attached to a `VALIDATION_ERROR`, if any.
    pub fn validation_result(&self) -> Option<&DataValidationResult> {
        match self {
            AppError::Validation(result) => Some(result),
            _ => None,
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("AppError", 3)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        if let AppError::Validation(result) = self {
            state.serialize_field("details", result)?;
        } else {
            state.skip_field("details")?;
        }
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
