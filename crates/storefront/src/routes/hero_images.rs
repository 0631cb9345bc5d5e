//! Hero carousel route handlers.
//!
//! The listing is read on every storefront page load, so it is served
//! through a short-TTL moka cache that mutations invalidate.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use dopetech_core::{HeroImage, HeroImageId};

use crate::db::media::{HeroImageRepository, NewHeroImage};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create/replace hero slide request body.
#[derive(Debug, Deserialize)]
pub struct HeroImageRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    #[serde(default = "default_show_content")]
    pub show_content: bool,
    #[serde(default)]
    pub display_order: i32,
}

const fn default_show_content() -> bool {
    true
}

impl HeroImageRequest {
    fn into_new(self) -> NewHeroImage {
        NewHeroImage {
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            image_url: self.image_url,
            show_content: self.show_content,
            display_order: self.display_order,
        }
    }
}

/// List slides in display order, served from cache when fresh.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<HeroImage>>> {
    let slides = state
        .hero_cache()
        .try_get_with((), async {
            HeroImageRepository::new(state.pool())
                .list()
                .await
                .map(Arc::new)
        })
        .await
        .map_err(|e| AppError::Internal(format!("hero listing failed: {e}")))?;

    Ok(Json(slides.as_ref().clone()))
}

/// Create a slide.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<HeroImageRequest>,
) -> Result<(StatusCode, Json<HeroImage>)> {
    let slide = HeroImageRepository::new(state.pool())
        .create(&body.into_new())
        .await?;

    state.hero_cache().invalidate(&()).await;
    Ok((StatusCode::CREATED, Json(slide)))
}

/// Replace a slide's fields.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<HeroImageId>,
    Json(body): Json<HeroImageRequest>,
) -> Result<Json<HeroImage>> {
    let slide = HeroImageRepository::new(state.pool())
        .update(id, &body.into_new())
        .await?;

    state.hero_cache().invalidate(&()).await;
    Ok(Json(slide))
}

/// Delete a slide.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<HeroImageId>,
) -> Result<StatusCode> {
    HeroImageRepository::new(state.pool()).delete(id).await?;

    state.hero_cache().invalidate(&()).await;
    Ok(StatusCode::NO_CONTENT)
}
