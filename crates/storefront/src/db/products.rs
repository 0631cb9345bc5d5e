//! Product repository for catalog database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use dopetech_core::{Product, ProductId, ProductImage, ProductImageId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, name, price, original_price, category, description, \
     features, color, image_url, discount, in_stock, rating, reviews_count, \
     created_at, updated_at";

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub original_price: Decimal,
    pub category: String,
    pub description: String,
    pub features: Vec<String>,
    pub color: String,
    pub image_url: Option<String>,
    pub discount: i32,
    pub in_stock: bool,
}

/// Partial update for a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub color: Option<String>,
    pub image_url: Option<Option<String>>,
    pub discount: Option<i32>,
    pub in_stock: Option<bool>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let products = match category {
            Some(category) => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id DESC"
                ))
                .bind(category)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id DESC"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Insert a new product and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products \
                 (name, price, original_price, category, description, features, \
                  color, image_url, discount, in_stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.price)
        .bind(new.original_price)
        .bind(&new.category)
        .bind(&new.description)
        .bind(&new.features)
        .bind(&new.color)
        .bind(&new.image_url)
        .bind(new.discount)
        .bind(new.in_stock)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a partial update and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        // COALESCE keeps the stored value where the caller passed nothing.
        // image_url uses a sentinel flag since "clear it" is a valid update.
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 price = COALESCE($3, price), \
                 original_price = COALESCE($4, original_price), \
                 category = COALESCE($5, category), \
                 description = COALESCE($6, description), \
                 features = COALESCE($7, features), \
                 color = COALESCE($8, color), \
                 image_url = CASE WHEN $9 THEN $10 ELSE image_url END, \
                 discount = COALESCE($11, discount), \
                 in_stock = COALESCE($12, in_stock), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.name)
        .bind(update.price)
        .bind(update.original_price)
        .bind(&update.category)
        .bind(&update.description)
        .bind(&update.features)
        .bind(&update.color)
        .bind(update.image_url.is_some())
        .bind(update.image_url.clone().flatten())
        .bind(update.discount)
        .bind(update.in_stock)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    /// Delete a product and its gallery images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List gallery images for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_images(&self, id: ProductId) -> Result<Vec<ProductImage>, RepositoryError> {
        let images = sqlx::query_as::<_, ProductImage>(
            "SELECT id, product_id, image_url, display_order \
             FROM product_images WHERE product_id = $1 ORDER BY display_order, id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }

    /// Add a gallery image to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including
    /// when the product does not exist; the FK violation surfaces here).
    pub async fn add_image(
        &self,
        id: ProductId,
        image_url: &str,
        display_order: i32,
    ) -> Result<ProductImage, RepositoryError> {
        let image = sqlx::query_as::<_, ProductImage>(
            "INSERT INTO product_images (product_id, image_url, display_order) \
             VALUES ($1, $2, $3) \
             RETURNING id, product_id, image_url, display_order",
        )
        .bind(id)
        .bind(image_url)
        .bind(display_order)
        .fetch_one(self.pool)
        .await?;

        Ok(image)
    }

    /// Delete a gallery image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such image exists for the
    /// product.
    pub async fn delete_image(
        &self,
        id: ProductId,
        image_id: ProductImageId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product_images WHERE id = $1 AND product_id = $2")
            .bind(image_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
