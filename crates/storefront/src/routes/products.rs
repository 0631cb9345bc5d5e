//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use dopetech_core::{Product, ProductId, ProductImage, ProductImageId};

use crate::db::products::{NewProduct, ProductRepository, ProductUpdate};
use crate::error::Result;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// Create product request body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    /// Defaults to `price` when absent (no discount).
    pub original_price: Option<Decimal>,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub color: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub discount: i32,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

/// Update product request body; absent fields are left unchanged.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub color: Option<String>,
    /// Present-but-null clears the image; absent leaves it unchanged.
    #[serde(default, deserialize_with = "present_or_absent")]
    pub image_url: Option<Option<String>>,
    pub discount: Option<i32>,
    pub in_stock: Option<bool>,
}

/// Add gallery image request body.
#[derive(Debug, Deserialize)]
pub struct AddImageRequest {
    pub image_url: String,
    #[serde(default)]
    pub display_order: i32,
}

/// Deserialize a field so that an absent key stays `None` while an
/// explicit `null` becomes `Some(None)`.
fn present_or_absent<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category.as_deref())
        .await?;
    Ok(Json(products))
}

/// Get a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool()).get(id).await?;
    Ok(Json(product))
}

/// Create a product.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let new = NewProduct {
        original_price: body.original_price.unwrap_or(body.price),
        name: body.name,
        price: body.price,
        category: body.category,
        description: body.description,
        features: body.features,
        color: body.color,
        image_url: body.image_url,
        discount: body.discount,
        in_stock: body.in_stock,
    };

    let product = ProductRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially update a product.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let update = ProductUpdate {
        name: body.name,
        price: body.price,
        original_price: body.original_price,
        category: body.category,
        description: body.description,
        features: body.features,
        color: body.color,
        image_url: body.image_url,
        discount: body.discount,
        in_stock: body.in_stock,
    };

    let product = ProductRepository::new(state.pool()).update(id, &update).await?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<StatusCode> {
    ProductRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List gallery images for a product.
#[instrument(skip(state))]
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<ProductImage>>> {
    let images = ProductRepository::new(state.pool()).list_images(id).await?;
    Ok(Json(images))
}

/// Add a gallery image to a product.
#[instrument(skip(state, body))]
pub async fn add_image(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<AddImageRequest>,
) -> Result<(StatusCode, Json<ProductImage>)> {
    let image = ProductRepository::new(state.pool())
        .add_image(id, &body.image_url, body.display_order)
        .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// Remove a gallery image.
#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(ProductId, ProductImageId)>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete_image(id, image_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_absent_vs_null_image() {
        let absent: UpdateProductRequest = serde_json::from_str("{}").expect("parse");
        assert_eq!(absent.image_url, None);

        let cleared: UpdateProductRequest =
            serde_json::from_str(r#"{"image_url": null}"#).expect("parse");
        assert_eq!(cleared.image_url, Some(None));

        let replaced: UpdateProductRequest =
            serde_json::from_str(r#"{"image_url": "/files/products/x.webp"}"#).expect("parse");
        assert_eq!(
            replaced.image_url,
            Some(Some("/files/products/x.webp".to_string()))
        );
    }

    #[test]
    fn test_create_request_defaults() {
        let body: CreateProductRequest = serde_json::from_str(
            r#"{"name": "Mouse", "price": "2500", "category": "mouse"}"#,
        )
        .expect("parse");
        assert!(body.in_stock);
        assert_eq!(body.discount, 0);
        assert!(body.features.is_empty());
        assert_eq!(body.original_price, None);
    }
}
