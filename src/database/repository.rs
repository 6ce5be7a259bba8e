//! Repository layer for database operations
//!
//! This module provides CRUD operations for all entities plus the
//! key-value settings sub-store. The repository is the only place that
//! talks SQL; services and the migration manager go through it.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for operations that need their own transaction
    /// scope (migration runs, rollbacks).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Records =====

    /// Insert a new record from a draft whose required fields are present.
    ///
    /// Callers are expected to run the draft through the validation engine
    /// first; a missing required field here is a programming error and is
    /// reported as such rather than as a validation result.
    pub async fn create_record(&self, draft: &RecordDraft) -> Result<CatchRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let caught_at = draft
            .caught_at
            .ok_or_else(|| AppError::Generic("create_record: caught_at missing".to_string()))?;
        let location = draft
            .location
            .as_deref()
            .ok_or_else(|| AppError::Generic("create_record: location missing".to_string()))?;
        let species = draft
            .species
            .as_deref()
            .ok_or_else(|| AppError::Generic("create_record: species missing".to_string()))?;

        let record = sqlx::query_as::<_, CatchRecord>(
            r#"
            INSERT INTO records (
                id, caught_at, location, species, size_cm, weight_g,
                water_temp_c, latitude, longitude, gps_accuracy, weather,
                notes, photo_id, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(caught_at)
        .bind(location)
        .bind(species)
        .bind(draft.size_cm)
        .bind(draft.weight_g)
        .bind(draft.water_temp_c)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .bind(draft.gps_accuracy)
        .bind(&draft.weather)
        .bind(&draft.notes)
        .bind(&draft.photo_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created record: {}", id);
        Ok(record)
    }

    /// Get a record by ID
    pub async fn get_record(&self, id: &str) -> Result<CatchRecord> {
        let record = sqlx::query_as::<_, CatchRecord>("SELECT * FROM records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::RecordNotFound(id.to_string()))?;

        Ok(record)
    }

    /// List all records, newest catch first
    pub async fn list_records(&self) -> Result<Vec<CatchRecord>> {
        let records = sqlx::query_as::<_, CatchRecord>(
            "SELECT * FROM records ORDER BY caught_at DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Write back the full state of an existing record
    pub async fn update_record(&self, record: &CatchRecord) -> Result<CatchRecord> {
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            UPDATE records SET
                caught_at = ?, location = ?, species = ?, size_cm = ?,
                weight_g = ?, water_temp_c = ?, latitude = ?, longitude = ?,
                gps_accuracy = ?, weather = ?, notes = ?, photo_id = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.caught_at)
        .bind(&record.location)
        .bind(&record.species)
        .bind(record.size_cm)
        .bind(record.weight_g)
        .bind(record.water_temp_c)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.gps_accuracy)
        .bind(&record.weather)
        .bind(&record.notes)
        .bind(&record.photo_id)
        .bind(now)
        .bind(&record.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::RecordNotFound(record.id.clone()));
        }

        tracing::debug!("Updated record: {}", record.id);
        self.get_record(&record.id).await
    }

    /// Delete a record
    pub async fn delete_record(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::RecordNotFound(id.to_string()));
        }

        tracing::debug!("Deleted record: {}", id);
        Ok(())
    }

    pub async fn count_records(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Distinct photo ids referenced by any record
    pub async fn referenced_photo_ids(&self) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT photo_id FROM records WHERE photo_id IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    // ===== Photos =====

    /// Create a photo metadata row
    pub async fn create_photo(
        &self,
        blob_hash: &str,
        mime_type: &str,
        size: i64,
    ) -> Result<Photo> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (id, blob_hash, mime_type, size, uploaded_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(blob_hash)
        .bind(mime_type)
        .bind(size)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created photo: {} ({} bytes)", id, size);
        Ok(photo)
    }

    /// Get a photo by ID, erroring if absent
    pub async fn get_photo(&self, id: &str) -> Result<Photo> {
        self.find_photo(id)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))
    }

    /// Look up a photo by ID without treating absence as an error.
    /// Used by the validation engine's reference check.
    pub async fn find_photo(&self, id: &str) -> Result<Option<Photo>> {
        let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(photo)
    }

    /// List all photos, newest first
    pub async fn list_photos(&self) -> Result<Vec<Photo>> {
        let photos =
            sqlx::query_as::<_, Photo>("SELECT * FROM photos ORDER BY uploaded_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(photos)
    }

    /// Delete a photo row, returning its blob hash so the caller can
    /// remove the content from the blob store.
    pub async fn delete_photo(&self, id: &str) -> Result<String> {
        let blob_hash: String = sqlx::query_scalar("SELECT blob_hash FROM photos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))?;

        sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Deleted photo: {}", id);
        Ok(blob_hash)
    }

    /// Number of photo rows sharing a blob hash. Content-addressed blobs
    /// may back several photos; the blob is only safe to remove when
    /// this reaches zero.
    pub async fn count_photos_with_hash(&self, blob_hash: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE blob_hash = ?")
            .bind(blob_hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Delete a batch of photo rows in one transaction
    pub async fn bulk_delete_photos(&self, ids: &[String]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut deleted = 0u64;

        for id in ids {
            deleted += sqlx::query("DELETE FROM photos WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::debug!("Bulk deleted {} photos", deleted);
        Ok(deleted)
    }

    // ===== Settings =====

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    pub async fn set_setting(&self, key: &str, value: &str, value_type: &str) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO settings (key, value, value_type, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                value_type = excluded.value_type,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(value_type)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Set setting: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Repository::new(pool)
    }

    fn minimal_draft() -> RecordDraft {
        RecordDraft {
            caught_at: Some(Utc::now()),
            location: Some("Harbor wall".to_string()),
            species: Some("Sea bass".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_record() {
        let repo = create_test_repo().await;

        let record = repo.create_record(&minimal_draft()).await.unwrap();
        assert_eq!(record.species, "Sea bass");

        let fetched = repo.get_record(&record.id).await.unwrap();
        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.location, "Harbor wall");
    }

    #[tokio::test]
    async fn test_create_record_rejects_incomplete_draft() {
        let repo = create_test_repo().await;

        let draft = RecordDraft {
            caught_at: Some(Utc::now()),
            ..Default::default()
        };

        assert!(repo.create_record(&draft).await.is_err());
    }

    #[tokio::test]
    async fn test_update_record() {
        let repo = create_test_repo().await;

        let mut record = repo.create_record(&minimal_draft()).await.unwrap();
        record.size_cm = Some(42.0);
        record.species = "Flounder".to_string();

        let updated = repo.update_record(&record).await.unwrap();
        assert_eq!(updated.size_cm, Some(42.0));
        assert_eq!(updated.species, "Flounder");
    }

    #[tokio::test]
    async fn test_delete_record() {
        let repo = create_test_repo().await;

        let record = repo.create_record(&minimal_draft()).await.unwrap();
        repo.delete_record(&record.id).await.unwrap();

        assert!(repo.get_record(&record.id).await.is_err());
        assert_eq!(repo.count_records().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_photo_round_trip() {
        let repo = create_test_repo().await;

        let photo = repo
            .create_photo("deadbeef", "image/jpeg", 2048)
            .await
            .unwrap();

        let fetched = repo.get_photo(&photo.id).await.unwrap();
        assert_eq!(fetched.blob_hash, "deadbeef");

        let hash = repo.delete_photo(&photo.id).await.unwrap();
        assert_eq!(hash, "deadbeef");
        assert!(repo.find_photo(&photo.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bulk_delete_photos() {
        let repo = create_test_repo().await;

        let mut ids = Vec::new();
        for i in 0..3 {
            let photo = repo
                .create_photo(&format!("hash{}", i), "image/png", 100)
                .await
                .unwrap();
            ids.push(photo.id);
        }

        let deleted = repo.bulk_delete_photos(&ids).await.unwrap();
        assert_eq!(deleted, 3);
        assert!(repo.list_photos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_referenced_photo_ids() {
        let repo = create_test_repo().await;

        let photo = repo.create_photo("h", "image/jpeg", 1).await.unwrap();

        let mut draft = minimal_draft();
        draft.photo_id = Some(photo.id.clone());
        repo.create_record(&draft).await.unwrap();
        repo.create_record(&minimal_draft()).await.unwrap();

        let referenced = repo.referenced_photo_ids().await.unwrap();
        assert_eq!(referenced, vec![photo.id]);
    }

    #[tokio::test]
    async fn test_settings_upsert() {
        let repo = create_test_repo().await;

        repo.set_setting("theme", "dark", "string").await.unwrap();
        assert_eq!(
            repo.get_setting("theme").await.unwrap(),
            Some("dark".to_string())
        );

        repo.set_setting("theme", "light", "string").await.unwrap();
        assert_eq!(
            repo.get_setting("theme").await.unwrap(),
            Some("light".to_string())
        );

        assert_eq!(repo.get_setting("missing").await.unwrap(), None);
    }
}
