//! Records service
//!
//! High-level business logic for catch records. Every create and update
//! runs the validation engine first; nothing invalid reaches the store.

use crate::database::{CatchRecord, RecordDraft, Repository, UpdateRecordRequest};
use crate::error::{AppError, Result};
use crate::validation::{DataValidationResult, ValidationOptions, Validator};

/// Service for managing catch records
#[derive(Clone)]
pub struct RecordsService {
    repo: Repository,
    validator: Validator,
}

impl RecordsService {
    pub fn new(repo: Repository) -> Self {
        let validator = Validator::new(repo.clone());
        Self { repo, validator }
    }

    /// Validate a draft without writing anything, for inline form
    /// feedback in the shell.
    pub async fn validate_draft(
        &self,
        draft: &RecordDraft,
        options: ValidationOptions,
    ) -> DataValidationResult {
        self.validator.validate_record(draft, options).await
    }

    /// Create a new record from a validated draft
    pub async fn create_record(&self, draft: RecordDraft) -> Result<CatchRecord> {
        let result = self
            .validator
            .validate_record(
                &draft,
                ValidationOptions {
                    check_references: true,
                    strict: true,
                },
            )
            .await;

        if !result.is_valid {
            tracing::info!(
                "Rejected record create: {} field errors, {} reference errors",
                result.field_errors().len(),
                result.reference_errors.len()
            );
            return Err(AppError::Validation(result));
        }

        for warning in &result.warnings {
            tracing::debug!("Record create warning: {}", warning);
        }

        let record = self.repo.create_record(&draft).await?;

        tracing::info!("Record created: {} ({})", record.id, record.species);
        Ok(record)
    }

    /// Get a record by ID
    pub async fn get_record(&self, id: &str) -> Result<CatchRecord> {
        self.repo.get_record(id).await
    }

    /// List all records, newest catch first
    pub async fn list_records(&self) -> Result<Vec<CatchRecord>> {
        self.repo.list_records().await
    }

    /// Update a record. The patch is merged onto the stored state and
    /// the merged result is re-validated before anything is written.
    pub async fn update_record(
        &self,
        id: &str,
        req: UpdateRecordRequest,
    ) -> Result<CatchRecord> {
        let mut record = self.repo.get_record(id).await?;
        apply_patch(&mut record, req);

        let draft = RecordDraft::from_record(&record);
        let result = self
            .validator
            .validate_record(
                &draft,
                ValidationOptions {
                    check_references: true,
                    strict: true,
                },
            )
            .await;

        if !result.is_valid {
            tracing::info!("Rejected record update for {}", id);
            return Err(AppError::Validation(result));
        }

        let updated = self.repo.update_record(&record).await?;

        tracing::debug!("Record updated: {}", updated.id);
        Ok(updated)
    }

    /// Delete a record
    pub async fn delete_record(&self, id: &str) -> Result<()> {
        self.repo.delete_record(id).await?;

        tracing::info!("Record deleted: {}", id);
        Ok(())
    }

    /// Case-insensitive search over species, location, and notes
    pub async fn search_records(&self, query: &str) -> Result<Vec<CatchRecord>> {
        let all_records = self.repo.list_records().await?;

        let query_lower = query.to_lowercase();

        let filtered: Vec<CatchRecord> = all_records
            .into_iter()
            .filter(|record| {
                record.species.to_lowercase().contains(&query_lower)
                    || record.location.to_lowercase().contains(&query_lower)
                    || record
                        .notes
                        .as_deref()
                        .map(|n| n.to_lowercase().contains(&query_lower))
                        .unwrap_or(false)
            })
            .collect();

        Ok(filtered)
    }
}

fn apply_patch(record: &mut CatchRecord, req: UpdateRecordRequest) {
    if let Some(caught_at) = req.caught_at {
        record.caught_at = caught_at;
    }
    if let Some(location) = req.location {
        record.location = location;
    }
    if let Some(species) = req.species {
        record.species = species;
    }
    if req.size_cm.is_some() {
        record.size_cm = req.size_cm;
    }
    if req.weight_g.is_some() {
        record.weight_g = req.weight_g;
    }
    if req.water_temp_c.is_some() {
        record.water_temp_c = req.water_temp_c;
    }
    if req.latitude.is_some() {
        record.latitude = req.latitude;
    }
    if req.longitude.is_some() {
        record.longitude = req.longitude;
    }
    if req.gps_accuracy.is_some() {
        record.gps_accuracy = req.gps_accuracy;
    }
    if req.weather.is_some() {
        record.weather = req.weather;
    }
    if req.notes.is_some() {
        record.notes = req.notes;
    }
    if req.photo_id.is_some() {
        record.photo_id = req.photo_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> RecordsService {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        RecordsService::new(Repository::new(pool))
    }

    fn valid_draft(species: &str) -> RecordDraft {
        RecordDraft {
            caught_at: Some(Utc::now() - chrono::Duration::hours(1)),
            location: Some("Pier".to_string()),
            species: Some(species.to_string()),
            size_cm: Some(30.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_record() {
        let service = create_test_service().await;

        let record = service.create_record(valid_draft("Sea bass")).await.unwrap();
        let fetched = service.get_record(&record.id).await.unwrap();

        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.species, "Sea bass");
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_with_details() {
        let service = create_test_service().await;

        let draft = RecordDraft {
            caught_at: Some(Utc::now()),
            location: Some("Pier".to_string()),
            species: None,
            ..Default::default()
        };

        let err = service.create_record(draft).await.err().unwrap();
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let result = err.validation_result().unwrap();
        assert!(result
            .fields
            .iter()
            .any(|f| f.field == "species" && !f.is_valid));

        // Nothing was stored
        assert!(service.list_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_dangling_photo_reference_is_rejected() {
        let service = create_test_service().await;

        let mut draft = valid_draft("Sea bass");
        draft.photo_id = Some("ghost".to_string());

        let err = service.create_record(draft).await.err().unwrap();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        let result = err.validation_result().unwrap();
        assert_eq!(result.reference_errors.len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_and_revalidates() {
        let service = create_test_service().await;
        let record = service.create_record(valid_draft("Sea bass")).await.unwrap();

        let updated = service
            .update_record(
                &record.id,
                UpdateRecordRequest {
                    size_cm: Some(45.0),
                    notes: Some("released".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.size_cm, Some(45.0));
        assert_eq!(updated.notes.as_deref(), Some("released"));
        // Untouched fields survive the merge
        assert_eq!(updated.species, "Sea bass");
    }

    #[tokio::test]
    async fn test_update_rejecting_bad_patch_leaves_record_unchanged() {
        let service = create_test_service().await;
        let record = service.create_record(valid_draft("Sea bass")).await.unwrap();

        let err = service
            .update_record(
                &record.id,
                UpdateRecordRequest {
                    size_cm: Some(5000.0),
                    ..Default::default()
                },
            )
            .await
            .err()
            .unwrap();
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let stored = service.get_record(&record.id).await.unwrap();
        assert_eq!(stored.size_cm, Some(30.0));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let service = create_test_service().await;

        let err = service
            .update_record("nope", UpdateRecordRequest::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.code(), "RECORD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_search_records() {
        let service = create_test_service().await;

        service.create_record(valid_draft("Sea bass")).await.unwrap();
        service.create_record(valid_draft("Mackerel")).await.unwrap();

        let mut with_notes = valid_draft("Flounder");
        with_notes.notes = Some("Caught at sunset near the lighthouse".to_string());
        service.create_record(with_notes).await.unwrap();

        let by_species = service.search_records("mackerel").await.unwrap();
        assert_eq!(by_species.len(), 1);
        assert_eq!(by_species[0].species, "Mackerel");

        let by_notes = service.search_records("LIGHTHOUSE").await.unwrap();
        assert_eq!(by_notes.len(), 1);
        assert_eq!(by_notes[0].species, "Flounder");

        let by_location = service.search_records("pier").await.unwrap();
        assert_eq!(by_location.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_record() {
        let service = create_test_service().await;
        let record = service.create_record(valid_draft("Sea bass")).await.unwrap();

        service.delete_record(&record.id).await.unwrap();

        assert!(service.get_record(&record.id).await.is_err());
    }
}
