//! Payment QR code route handlers.
//!
//! Checkout shows the customer an active bank/wallet QR to pay against;
//! these routes manage that set.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use dopetech_core::{QrCode, QrCodeId};

use crate::db::media::QrCodeRepository;
use crate::error::Result;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `?active=true` restricts to enabled codes.
    #[serde(default)]
    pub active: bool,
}

/// Create QR code request body.
#[derive(Debug, Deserialize)]
pub struct CreateQrCodeRequest {
    pub name: String,
    pub image_url: String,
}

/// Patch QR code request body; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateQrCodeRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// List QR codes.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<QrCode>>> {
    let codes = QrCodeRepository::new(state.pool()).list(query.active).await?;
    Ok(Json(codes))
}

/// Create a QR code (active by default).
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateQrCodeRequest>,
) -> Result<(StatusCode, Json<QrCode>)> {
    let code = QrCodeRepository::new(state.pool())
        .create(&body.name, &body.image_url)
        .await?;
    Ok((StatusCode::CREATED, Json(code)))
}

/// Rename or toggle a QR code.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<QrCodeId>,
    Json(body): Json<UpdateQrCodeRequest>,
) -> Result<Json<QrCode>> {
    let code = QrCodeRepository::new(state.pool())
        .update(id, body.name.as_deref(), body.is_active)
        .await?;
    Ok(Json(code))
}

/// Delete a QR code.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<QrCodeId>) -> Result<StatusCode> {
    QrCodeRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
