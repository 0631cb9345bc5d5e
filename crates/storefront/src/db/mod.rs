//! Database operations for the storefront `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `products` / `product_images` - Catalog
//! - `hero_images` - Home carousel slides
//! - `qr_codes` - Payment QR codes shown at checkout
//! - `orders` / `order_items` - Checkout persistence
//! - `assets` - Uploaded file records
//! - `session` - Tower-sessions storage (cart lives here)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p dopetech-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod assets;
pub mod media;
pub mod orders;
pub mod products;

pub use assets::{AssetRepository, NewAsset};
pub use media::{HeroImageRepository, QrCodeRepository};
pub use orders::{NewOrder, NewOrderItem, OrderRepository};
pub use products::ProductRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be interpreted.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<sqlx::Error> for RepositoryError {
    /// Decode failures mean a stored value no longer parses (for example a
    /// status column holding an unknown label), so they are classified as
    /// corruption rather than as a transport-level database error.
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::DataCorruption(format!("column {index}: {source}"))
            }
            sqlx::Error::Decode(source) => Self::DataCorruption(source.to_string()),
            other => Self::Database(other),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_decode_classified_as_corruption() {
        let err = RepositoryError::from(sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: "unknown order status: shipped".into(),
        });

        assert!(matches!(err, RepositoryError::DataCorruption(_)));
        let msg = err.to_string();
        assert!(msg.contains("status"));
        assert!(msg.contains("shipped"));
    }

    #[test]
    fn test_decode_classified_as_corruption() {
        let err = RepositoryError::from(sqlx::Error::Decode("bad value".into()));
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn test_other_errors_stay_database() {
        let err = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
