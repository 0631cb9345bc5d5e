//! Catalog product types.
//!
//! Products are owned by the catalog and immutable from the cart's
//! perspective; the cart copies the fields it needs into line-item
//! snapshots at add time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, ProductImageId};

/// A catalog product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Current selling price in NPR.
    pub price: Decimal,
    /// Pre-discount price in NPR. Equal to `price` when not discounted.
    pub original_price: Decimal,
    pub category: String,
    pub description: String,
    /// Selectable feature options (e.g. switch type, layout).
    pub features: Vec<String>,
    /// Available colors as a comma-joined string (legacy catalog format).
    pub color: String,
    pub image_url: Option<String>,
    /// Discount percentage, 0 when none.
    pub discount: i32,
    pub in_stock: bool,
    pub rating: Decimal,
    pub reviews_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Split the comma-joined `color` field into individual color options.
    ///
    /// Empty segments are dropped, so `"Black, ,Red"` yields two options.
    #[must_use]
    pub fn color_options(&self) -> Vec<&str> {
        self.color
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}

/// A secondary product image (gallery entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image_url: String,
    pub display_order: i32,
}

/// A hero carousel slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct HeroImage {
    pub id: super::HeroImageId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image_url: String,
    /// Whether the title/subtitle overlay is rendered on the slide.
    pub show_content: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A payment QR code (bank / wallet transfer target shown at checkout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct QrCode {
    pub id: super::QrCodeId,
    pub name: String,
    pub image_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
