//! Content-addressed photo blob storage
//!
//! Photo bytes are stored on disk keyed by their SHA-256 hash, with a
//! two-level directory fan-out to keep directories small. Metadata
//! (mime type, size, upload time) lives in the `photos` table; this
//! store only ever sees raw bytes.
//!
//! Hash "abcd1234..." lands at "photos/ab/cd/abcd1234...".

use crate::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Content-addressed store for photo bytes
#[derive(Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root directory if needed
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Photo store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Store photo bytes, returning their SHA-256 hash.
    ///
    /// Identical content is stored once; storing it again is a no-op that
    /// returns the same hash.
    pub async fn store(&self, data: &[u8]) -> Result<String> {
        let hash = hash_bytes(data);
        let path = self.blob_path(&hash);

        if fs::try_exists(&path).await? {
            tracing::debug!("Photo blob already present: {}", hash);
            return Ok(hash);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a temp file, fsync, then rename into place so a crash
        // never leaves a half-written blob under its final name.
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!("Stored photo blob: {} ({} bytes)", hash, data.len());
        Ok(hash)
    }

    /// Load photo bytes by hash
    pub async fn load(&self, hash: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(hash);

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::BlobStore(
                format!("Photo blob not found: {}", hash),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a blob with this hash exists
    pub async fn contains(&self, hash: &str) -> Result<bool> {
        Ok(fs::try_exists(self.blob_path(hash)).await?)
    }

    /// Remove a blob; removing an absent blob is not an error
    pub async fn remove(&self, hash: &str) -> Result<()> {
        match fs::remove_file(self.blob_path(hash)).await {
            Ok(()) => {
                tracing::debug!("Removed photo blob: {}", hash);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Every blob hash currently on disk, for maintenance scans
    pub async fn all_hashes(&self) -> Result<Vec<String>> {
        let mut hashes = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            if !fs::try_exists(&dir).await? {
                continue;
            }

            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if is_blob_hash(name) {
                        hashes.push(name.to_string());
                    }
                }
            }
        }

        Ok(hashes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, hash: &str) -> PathBuf {
        // Guard against short or hostile keys; anything that is not a
        // full hash cannot exist in the store.
        if !is_blob_hash(hash) {
            return self.root.join("invalid").join(hash.replace('/', "_"));
        }
        self.root.join(&hash[0..2]).join(&hash[2..4]).join(hash)
    }
}

fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

fn is_blob_hash(name: &str) -> bool {
    name.len() == 64 && name.chars().all(|c| c.is_ascii_hexdigit())
}
