//! Local filesystem asset storage.
//!
//! Uploaded files land under the configured asset root, one subdirectory
//! per bucket, and are served statically at `/files/{bucket}/{object}`.
//! Object names are generated server-side (UUID plus the original
//! extension) so client file names never touch the filesystem.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Buckets the API accepts. Mirrors the storage buckets of the hosted
/// object store this service replaced.
pub const ALLOWED_BUCKETS: &[&str] = &["assets", "receipts", "products", "hero"];

/// Errors from asset storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The bucket name is not one of [`ALLOWED_BUCKETS`].
    #[error("invalid bucket: {0}")]
    InvalidBucket(String),
}

/// Filesystem-backed asset storage.
#[derive(Debug, Clone)]
pub struct AssetStorage {
    root: PathBuf,
    public_base: String,
}

impl AssetStorage {
    /// Create a storage handle rooted at `root`, generating public URLs
    /// under `base_url`.
    #[must_use]
    pub fn new(root: PathBuf, base_url: &str) -> Self {
        Self {
            root,
            public_base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The directory served statically at `/files`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generate a stored object name from the uploaded file name: a UUID
    /// plus the original extension (lowercased), if it has a sane one.
    #[must_use]
    pub fn object_name(original_name: &str) -> String {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(char::is_alphanumeric))
            .map(str::to_lowercase);

        match extension {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        }
    }

    /// The public URL a stored object is served from.
    #[must_use]
    pub fn public_url(&self, bucket: &str, object_name: &str) -> String {
        format!("{}/files/{bucket}/{object_name}", self.public_base)
    }

    /// Write `bytes` into the bucket and return the public URL.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidBucket` for unknown buckets and
    /// `StorageError::Io` if the write fails.
    pub async fn save(
        &self,
        bucket: &str,
        object_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        validate_bucket(bucket)?;

        let dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(object_name), bytes).await?;

        Ok(self.public_url(bucket, object_name))
    }

    /// Remove a stored object. Missing files are not an error; the row
    /// delete proceeds regardless.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidBucket` for unknown buckets and
    /// `StorageError::Io` for filesystem failures other than not-found.
    pub async fn remove(&self, bucket: &str, object_name: &str) -> Result<(), StorageError> {
        validate_bucket(bucket)?;

        match tokio::fs::remove_file(self.root.join(bucket).join(object_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_bucket(bucket: &str) -> Result<(), StorageError> {
    if ALLOWED_BUCKETS.contains(&bucket) {
        Ok(())
    } else {
        Err(StorageError::InvalidBucket(bucket.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> AssetStorage {
        let root = std::env::temp_dir()
            .join("dopetech-storage-test")
            .join(Uuid::new_v4().to_string());
        AssetStorage::new(root, "http://localhost:3000/")
    }

    #[test]
    fn test_object_name_keeps_extension() {
        let name = AssetStorage::object_name("receipt scan.PNG");
        assert!(name.ends_with(".png"));
        assert!(!name.contains(' '));
    }

    #[test]
    fn test_object_name_drops_weird_extension() {
        let name = AssetStorage::object_name("archive.tar.gz-backup/../etc");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_public_url_has_no_double_slash() {
        let storage = temp_storage();
        let url = storage.public_url("assets", "a.png");
        assert_eq!(url, "http://localhost:3000/files/assets/a.png");
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_bucket() {
        let storage = temp_storage();
        let result = storage.save("../../etc", "x", b"data").await;
        assert!(matches!(result, Err(StorageError::InvalidBucket(_))));
    }

    #[tokio::test]
    async fn test_save_and_remove_roundtrip() {
        let storage = temp_storage();
        let url = storage
            .save("assets", "test.bin", b"hello")
            .await
            .expect("save");
        assert!(url.ends_with("/files/assets/test.bin"));

        let stored = storage.root().join("assets").join("test.bin");
        assert_eq!(tokio::fs::read(&stored).await.expect("read back"), b"hello");

        storage.remove("assets", "test.bin").await.expect("remove");
        assert!(!stored.exists());

        // Removing again is not an error
        storage.remove("assets", "test.bin").await.expect("idempotent");
    }
}
