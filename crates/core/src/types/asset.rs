//! Uploaded asset records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::AssetId;

/// A file uploaded through the asset API and served from local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Asset {
    pub id: AssetId,
    /// Logical grouping: "assets", "receipts", "products", "hero".
    pub bucket: String,
    /// Stored object name, unique within the bucket.
    pub object_name: String,
    /// File name as uploaded by the client.
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// Public URL the file is served from.
    pub public_url: String,
    pub uploaded_at: DateTime<Utc>,
}
