//! Photos service
//!
//! Handles photo uploads for catch records. Validates the upload,
//! writes the bytes to the content-addressed store, and keeps the
//! metadata row in sync with the blob.

use crate::database::{Photo, PhotoUpload, Repository};
use crate::error::{AppError, Result};
use crate::storage::PhotoStore;
use crate::validation::engine::validate_photo_upload;

/// Service for managing photos
#[derive(Clone)]
pub struct PhotosService {
    repo: Repository,
    photo_store: PhotoStore,
}

impl PhotosService {
    pub fn new(repo: Repository, photo_store: PhotoStore) -> Self {
        Self { repo, photo_store }
    }

    /// Validate and store a photo upload
    pub async fn store_photo(&self, upload: PhotoUpload) -> Result<Photo> {
        tracing::info!(
            "Storing photo ({}, {} bytes)",
            upload.mime_type,
            upload.data.len()
        );

        let result = validate_photo_upload(&upload);
        if !result.is_valid {
            return Err(AppError::Validation(result));
        }
        for warning in &result.warnings {
            tracing::debug!("Photo upload warning: {}", warning);
        }

        let hash = self.photo_store.store(&upload.data).await?;
        let photo = self
            .repo
            .create_photo(&hash, &upload.mime_type, upload.data.len() as i64)
            .await?;

        tracing::info!("Photo stored: {}", photo.id);
        Ok(photo)
    }

    /// Get photo metadata by ID
    pub async fn get_photo(&self, id: &str) -> Result<Photo> {
        self.repo.get_photo(id).await
    }

    /// Get the photo bytes by ID
    pub async fn photo_data(&self, id: &str) -> Result<Vec<u8>> {
        let photo = self.repo.get_photo(id).await?;
        self.photo_store.load(&photo.blob_hash).await
    }

    /// List all photos
    pub async fn list_photos(&self) -> Result<Vec<Photo>> {
        self.repo.list_photos().await
    }

    /// Delete a photo. The blob is removed only when no other photo row
    /// shares its content.
    pub async fn delete_photo(&self, id: &str) -> Result<()> {
        let blob_hash = self.repo.delete_photo(id).await?;

        if self.repo.count_photos_with_hash(&blob_hash).await? == 0 {
            self.photo_store.remove(&blob_hash).await?;
        }

        tracing::info!("Photo deleted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;

    async fn create_test_service() -> (PhotosService, TempDir) {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        let temp_dir = TempDir::new().unwrap();
        let photo_store = PhotoStore::new(temp_dir.path().join("photos"));
        photo_store.initialize().await.unwrap();

        (
            PhotosService::new(Repository::new(pool), photo_store),
            temp_dir,
        )
    }

    fn jpeg_upload(data: &[u8]) -> PhotoUpload {
        PhotoUpload {
            mime_type: "image/jpeg".to_string(),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_store_and_read_back() {
        let (service, _temp) = create_test_service().await;

        let photo = service.store_photo(jpeg_upload(b"fake jpeg")).await.unwrap();
        assert_eq!(photo.mime_type, "image/jpeg");
        assert_eq!(photo.size, 9);

        let data = service.photo_data(&photo.id).await.unwrap();
        assert_eq!(data, b"fake jpeg");
    }

    #[tokio::test]
    async fn test_invalid_upload_is_rejected() {
        let (service, _temp) = create_test_service().await;

        let err = service
            .store_photo(PhotoUpload {
                mime_type: "text/plain".to_string(),
                data: b"not an image".to_vec(),
            })
            .await
            .err()
            .unwrap();

        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(service.list_photos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let (service, _temp) = create_test_service().await;

        let err = service.store_photo(jpeg_upload(b"")).await.err().unwrap();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_blob() {
        let (service, _temp) = create_test_service().await;

        let photo = service.store_photo(jpeg_upload(b"bytes")).await.unwrap();
        let hash = photo.blob_hash.clone();

        service.delete_photo(&photo.id).await.unwrap();

        assert!(service.get_photo(&photo.id).await.is_err());
        assert!(!service.photo_store.contains(&hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_shared_blob_survives_deleting_one_copy() {
        let (service, _temp) = create_test_service().await;

        // Same bytes uploaded twice: two rows, one blob
        let first = service.store_photo(jpeg_upload(b"shared")).await.unwrap();
        let second = service.store_photo(jpeg_upload(b"shared")).await.unwrap();
        assert_eq!(first.blob_hash, second.blob_hash);

        service.delete_photo(&first.id).await.unwrap();

        // The second photo still resolves to its bytes
        let data = service.photo_data(&second.id).await.unwrap();
        assert_eq!(data, b"shared");
    }
}
