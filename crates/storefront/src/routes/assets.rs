//! Asset upload route handlers.
//!
//! Uploads are multipart: a `bucket` field naming the target bucket and a
//! `file` field carrying the payload. The file lands on disk under the
//! asset root first, then a row records it; the public URL points at the
//! static `/files/{bucket}/{object}` mount.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use dopetech_core::{Asset, AssetId};

use crate::db::{AssetRepository, NewAsset};
use crate::error::{AppError, Result};
use crate::services::storage::AssetStorage;
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Asset list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub bucket: Option<String>,
}

/// List stored assets, optionally filtered by bucket.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Asset>>> {
    let assets = AssetRepository::new(state.pool())
        .list(query.bucket.as_deref())
        .await?;

    Ok(Json(assets))
}

/// Upload a file into a bucket and record it.
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Asset>)> {
    let mut bucket: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        match field.name() {
            Some("bucket") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid bucket field: {e}")))?;
                bucket = Some(value);
            }
            Some("file") => {
                let original_name = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
                file = Some((original_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let bucket =
        bucket.ok_or_else(|| AppError::BadRequest("Missing 'bucket' field".to_string()))?;
    let (original_name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let object_name = AssetStorage::object_name(&original_name);
    let public_url = state.storage().save(&bucket, &object_name, &bytes).await?;

    let asset = AssetRepository::new(state.pool())
        .create(&NewAsset {
            bucket,
            object_name,
            original_name,
            content_type,
            size_bytes: i64::try_from(bytes.len()).unwrap_or(i64::MAX),
            public_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(asset)))
}

/// Delete an asset row and its file. A file-removal failure is logged;
/// the row delete proceeds so the listing stays accurate.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<AssetId>) -> Result<StatusCode> {
    let repo = AssetRepository::new(state.pool());
    let asset = repo.get(id).await?;

    if let Err(e) = state
        .storage()
        .remove(&asset.bucket, &asset.object_name)
        .await
    {
        tracing::error!(
            bucket = %asset.bucket,
            object = %asset.object_name,
            "Failed to remove stored file: {e}"
        );
    }

    repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
