//! Migration manager
//!
//! Orchestrates data migrations against the record store: tracks the
//! persisted data version, applies pending migrations inside a single
//! transaction, rolls individual migrations back, and runs the
//! integrity and orphan-cleanup maintenance passes.
//!
//! At most one run or rollback may touch the store at a time; the
//! enclosing transaction enforces that (SQLite serializes writers).

use super::registry::{DataMigration, MigrationInfo, MigrationRegistry};
use crate::config;
use crate::database::{DataVersion, Photo, RecordDraft, Repository};
use crate::error::{AppError, Result};
use crate::storage::PhotoStore;
use crate::validation::{ValidationOptions, Validator};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// A migration failure inside a run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MigrationError {
    pub id: String,
    pub message: String,
}

/// Outcome of `run_migrations`
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub success: bool,
    pub applied_migrations: Vec<String>,
    /// Migrations that were pending but not applied: the full pending
    /// list on a dry run, the not-yet-attempted tail on a failure.
    pub skipped_migrations: Vec<String>,
    pub errors: Vec<MigrationError>,
}

/// Outcome of `check_data_integrity`
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub orphaned_photos: usize,
    pub invalid_records: usize,
    pub issues: Vec<String>,
}

/// Outcome of `cleanup_orphaned_photos`
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub deleted_count: usize,
    pub deleted_ids: Vec<String>,
}

/// Outcome of `check_schema_compatibility`
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    pub compatible: bool,
    pub persisted_schema_version: i64,
    pub supported_schema_version: i64,
}

/// Orchestrates data migrations and maintenance over the record store
#[derive(Clone)]
pub struct MigrationManager {
    repo: Repository,
    photo_store: PhotoStore,
    registry: MigrationRegistry,
}

impl MigrationManager {
    pub fn new(repo: Repository, photo_store: PhotoStore, registry: MigrationRegistry) -> Self {
        Self {
            repo,
            photo_store,
            registry,
        }
    }

    // ===== Version tracking =====

    /// The persisted data version, or the unmigrated default if none
    /// has been written yet.
    pub async fn data_version(&self) -> Result<DataVersion> {
        let raw = self
            .repo
            .get_setting(config::DATA_VERSION_KEY)
            .await
            .map_err(|e| AppError::VersionGet(e.to_string()))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| AppError::VersionGet(format!("stored version is unreadable: {}", e))),
            None => Ok(DataVersion::default()),
        }
    }

    /// Persist a data version.
    ///
    /// Also the retry path for a run whose data changes committed but
    /// whose version write failed ("migrated but version-tracking
    /// stale") — retry this, never the migrations themselves.
    pub async fn update_data_version(&self, version: &DataVersion) -> Result<()> {
        let json = serde_json::to_string(version)
            .map_err(|e| AppError::VersionUpdate(e.to_string()))?;

        self.repo
            .set_setting(config::DATA_VERSION_KEY, &json, "json")
            .await
            .map_err(|e| AppError::VersionUpdate(e.to_string()))?;

        Ok(())
    }

    /// Whether the persisted data is something this engine understands.
    /// Data written by a newer engine (higher schema version) is not.
    pub async fn check_schema_compatibility(&self) -> Result<CompatibilityReport> {
        let version = self
            .data_version()
            .await
            .map_err(|e| AppError::SchemaCompatibility(e.to_string()))?;

        Ok(CompatibilityReport {
            compatible: version.schema_version <= config::CURRENT_SCHEMA_VERSION,
            persisted_schema_version: version.schema_version,
            supported_schema_version: config::CURRENT_SCHEMA_VERSION,
        })
    }

    // ===== Migration execution =====

    /// Registered migrations not yet applied, in registration order
    pub async fn pending_migrations(&self) -> Result<Vec<MigrationInfo>> {
        let version = self.data_version().await?;
        Ok(self
            .pending(&version)
            .iter()
            .map(|m| MigrationInfo::of(m.as_ref()))
            .collect())
    }

    fn pending(&self, version: &DataVersion) -> Vec<Arc<dyn DataMigration>> {
        let applied: HashSet<&str> = version
            .migrations_applied
            .iter()
            .map(String::as_str)
            .collect();

        self.registry
            .iter()
            .filter(|m| !applied.contains(m.id()))
            .cloned()
            .collect()
    }

    /// Apply every pending migration.
    ///
    /// All data changes of a run share one transaction: the first
    /// failure rolls back everything and nothing is marked applied.
    /// With `dry_run` the pending list is reported as skipped and
    /// storage is untouched.
    pub async fn run_migrations(&self, dry_run: bool) -> Result<MigrationReport> {
        let version = self.data_version().await?;
        let pending = self.pending(&version);
        let pending_ids: Vec<String> = pending.iter().map(|m| m.id().to_string()).collect();

        if pending.is_empty() {
            tracing::info!("No pending data migrations");
            return Ok(MigrationReport {
                success: true,
                applied_migrations: Vec::new(),
                skipped_migrations: Vec::new(),
                errors: Vec::new(),
            });
        }

        if dry_run {
            tracing::info!("Dry run: {} migrations pending", pending.len());
            return Ok(MigrationReport {
                success: true,
                applied_migrations: Vec::new(),
                skipped_migrations: pending_ids,
                errors: Vec::new(),
            });
        }

        let mut tx = self.repo.pool().begin().await?;

        for (idx, migration) in pending.iter().enumerate() {
            tracing::info!(
                "Applying data migration {} ({})",
                migration.id(),
                migration.description()
            );

            if let Err(e) = migration.up(&mut *tx).await {
                tx.rollback().await?;
                tracing::error!(
                    "Data migration {} failed, run aborted and rolled back; \
                     would have applied: {:?}: {}",
                    migration.id(),
                    pending_ids,
                    e
                );

                return Ok(MigrationReport {
                    success: false,
                    applied_migrations: Vec::new(),
                    skipped_migrations: pending_ids[idx + 1..].to_vec(),
                    errors: vec![MigrationError {
                        id: migration.id().to_string(),
                        message: e.to_string(),
                    }],
                });
            }
        }

        tx.commit().await?;

        // The data changes are durable from here on. A failure below
        // leaves version tracking stale, not the data broken.
        let mut updated = version;
        updated.version = env!("CARGO_PKG_VERSION").to_string();
        updated.schema_version = updated.schema_version.max(config::CURRENT_SCHEMA_VERSION);
        updated.migrations_applied.extend(pending_ids.iter().cloned());
        updated.last_migration_date = Some(Utc::now());
        self.update_data_version(&updated).await?;

        tracing::info!("Applied {} data migrations", pending_ids.len());

        Ok(MigrationReport {
            success: true,
            applied_migrations: pending_ids,
            skipped_migrations: Vec::new(),
            errors: Vec::new(),
        })
    }

    /// Undo a single applied migration via its `down` step.
    pub async fn rollback_migration(&self, id: &str) -> Result<()> {
        let migration = self
            .registry
            .get(id)
            .ok_or_else(|| AppError::MigrationNotFound(id.to_string()))?;

        if !migration.supports_rollback() {
            return Err(AppError::RollbackNotSupported(id.to_string()));
        }

        let mut version = self.data_version().await?;
        if !version.migrations_applied.iter().any(|m| m == id) {
            return Err(AppError::RollbackFailed {
                id: id.to_string(),
                message: "migration is not currently applied".to_string(),
            });
        }

        let mut tx = self.repo.pool().begin().await?;
        if let Err(e) = migration.down(&mut *tx).await {
            tx.rollback().await?;
            tracing::error!("Rollback of migration {} failed: {}", id, e);
            return Err(AppError::RollbackFailed {
                id: id.to_string(),
                message: e.to_string(),
            });
        }
        tx.commit().await?;

        // Exactly one entry leaves the applied list; the schema version
        // never decreases.
        version.migrations_applied.retain(|m| m != id);
        self.update_data_version(&version).await?;

        tracing::info!("Rolled back data migration {}", id);
        Ok(())
    }

    // ===== Integrity & maintenance =====

    /// Photos no record references
    pub async fn find_orphaned_photos(&self) -> Result<Vec<Photo>> {
        let photos = self
            .repo
            .list_photos()
            .await
            .map_err(|e| AppError::OrphanScanFailed(e.to_string()))?;
        let referenced: HashSet<String> = self
            .repo
            .referenced_photo_ids()
            .await
            .map_err(|e| AppError::OrphanScanFailed(e.to_string()))?
            .into_iter()
            .collect();

        Ok(photos
            .into_iter()
            .filter(|p| !referenced.contains(&p.id))
            .collect())
    }

    /// Full data sweep: orphaned photos plus a strict, reference-checked
    /// validation of every stored record. Read-only.
    pub async fn check_data_integrity(&self) -> Result<IntegrityReport> {
        let mut issues = Vec::new();

        let orphans = self
            .find_orphaned_photos()
            .await
            .map_err(|e| AppError::IntegrityCheckFailed(e.to_string()))?;
        for photo in &orphans {
            issues.push(format!("Photo {} is not referenced by any record", photo.id));
        }

        let records = self
            .repo
            .list_records()
            .await
            .map_err(|e| AppError::IntegrityCheckFailed(e.to_string()))?;

        let validator = Validator::new(self.repo.clone());
        let options = ValidationOptions {
            check_references: true,
            strict: true,
        };

        let mut invalid_records = 0;
        for record in &records {
            let draft = RecordDraft::from_record(record);
            let result = validator.validate_record(&draft, options).await;
            if !result.is_valid {
                invalid_records += 1;
                let mut problems: Vec<String> =
                    result.field_errors().iter().map(|e| e.to_string()).collect();
                problems.extend(result.reference_errors.iter().cloned());
                issues.push(format!(
                    "Record {} failed validation: {}",
                    record.id,
                    problems.join("; ")
                ));
            }
        }

        let report = IntegrityReport {
            is_valid: orphans.is_empty() && invalid_records == 0,
            orphaned_photos: orphans.len(),
            invalid_records,
            issues,
        };

        if !report.is_valid {
            tracing::warn!(
                "Integrity check found {} orphaned photos, {} invalid records",
                report.orphaned_photos,
                report.invalid_records
            );
        }

        Ok(report)
    }

    /// Delete every orphaned photo (metadata row and, when no other
    /// photo shares its content, the blob). With `dry_run` the report
    /// lists what would go without touching anything.
    pub async fn cleanup_orphaned_photos(&self, dry_run: bool) -> Result<CleanupReport> {
        let orphans = self.find_orphaned_photos().await?;
        let ids: Vec<String> = orphans.iter().map(|p| p.id.clone()).collect();

        if dry_run || orphans.is_empty() {
            return Ok(CleanupReport {
                deleted_count: ids.len(),
                deleted_ids: ids,
            });
        }

        self.repo
            .bulk_delete_photos(&ids)
            .await
            .map_err(|e| AppError::CleanupFailed(e.to_string()))?;

        for photo in &orphans {
            let remaining = self
                .repo
                .count_photos_with_hash(&photo.blob_hash)
                .await
                .map_err(|e| AppError::CleanupFailed(e.to_string()))?;
            if remaining == 0 {
                self.photo_store
                    .remove(&photo.blob_hash)
                    .await
                    .map_err(|e| AppError::CleanupFailed(e.to_string()))?;
            }
        }

        tracing::info!("Cleaned up {} orphaned photos", ids.len());

        Ok(CleanupReport {
            deleted_count: ids.len(),
            deleted_ids: ids,
        })
    }
}
