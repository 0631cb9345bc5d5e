//! Repository for uploaded asset records.
//!
//! Rows here describe files written by `services::storage`; the row is the
//! source of truth for listing, the file on disk is the served content.

use sqlx::PgPool;

use dopetech_core::{Asset, AssetId};

use super::RepositoryError;

const ASSET_COLUMNS: &str =
    "id, bucket, object_name, original_name, content_type, size_bytes, public_url, uploaded_at";

/// Fields for recording an uploaded file.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub bucket: String,
    pub object_name: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub public_url: String,
}

/// Repository for asset database operations.
pub struct AssetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AssetRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List assets, optionally restricted to one bucket, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, bucket: Option<&str>) -> Result<Vec<Asset>, RepositoryError> {
        let assets = match bucket {
            Some(bucket) => {
                sqlx::query_as::<_, Asset>(&format!(
                    "SELECT {ASSET_COLUMNS} FROM assets WHERE bucket = $1 ORDER BY uploaded_at DESC"
                ))
                .bind(bucket)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Asset>(&format!(
                    "SELECT {ASSET_COLUMNS} FROM assets ORDER BY uploaded_at DESC"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(assets)
    }

    /// Get an asset by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such asset exists.
    pub async fn get(&self, id: AssetId) -> Result<Asset, RepositoryError> {
        sqlx::query_as::<_, Asset>(&format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Record an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the object name is already
    /// taken within the bucket.
    pub async fn create(&self, new: &NewAsset) -> Result<Asset, RepositoryError> {
        let asset = sqlx::query_as::<_, Asset>(&format!(
            "INSERT INTO assets \
                 (bucket, object_name, original_name, content_type, size_bytes, public_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ASSET_COLUMNS}"
        ))
        .bind(&new.bucket)
        .bind(&new.object_name)
        .bind(&new.original_name)
        .bind(&new.content_type)
        .bind(new.size_bytes)
        .bind(&new.public_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("object name already exists".to_owned());
            }
            e.into()
        })?;

        Ok(asset)
    }

    /// Delete an asset row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such asset exists.
    pub async fn delete(&self, id: AssetId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
