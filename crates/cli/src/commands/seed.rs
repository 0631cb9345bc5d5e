//! Catalog seeding command.
//!
//! Reads a YAML file of products and inserts them. Existing rows are left
//! alone; seeding the same file twice inserts duplicates, so it is meant
//! for fresh databases and demo environments.
//!
//! # File Format
//!
//! ```yaml
//! products:
//!   - name: "Ajazz AK820 Pro"
//!     price: "4999"
//!     original_price: "5999"
//!     category: "keyboard"
//!     description: "75% gasket-mounted mechanical keyboard"
//!     features: ["RGB", "Hot-swap", "Tri-mode"]
//!     color: "Black, White"
//!     discount: 16
//! ```
//!
//! Prices are strings because the wire format carries decimals as strings.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use super::{CommandError, database_url};

/// Top-level seed file structure.
#[derive(Debug, Deserialize)]
struct Catalog {
    products: Vec<SeedProduct>,
}

/// One product entry in the seed file.
#[derive(Debug, Deserialize)]
struct SeedProduct {
    name: String,
    price: Decimal,
    /// Defaults to `price` when absent (no discount shown).
    original_price: Option<Decimal>,
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    features: Vec<String>,
    /// Comma-separated color options.
    #[serde(default)]
    color: String,
    image_url: Option<String>,
    #[serde(default)]
    discount: i32,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

/// Seed the product catalog from a YAML file.
pub async fn run(file: &str) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let raw = std::fs::read_to_string(file)?;
    let catalog: Catalog = serde_yaml::from_str(&raw)?;
    tracing::info!("Loaded {} products from {file}", catalog.products.len());

    let database_url = database_url()?;
    let pool = PgPool::connect(&database_url).await?;

    let mut inserted = 0usize;
    for product in &catalog.products {
        insert_product(&pool, product).await?;
        inserted += 1;
        tracing::info!("Seeded product: {}", product.name);
    }

    tracing::info!("Seeding complete: {inserted} products inserted");
    Ok(())
}

async fn insert_product(pool: &PgPool, product: &SeedProduct) -> Result<(), CommandError> {
    sqlx::query(
        "INSERT INTO products \
             (name, price, original_price, category, description, features, \
              color, image_url, discount, in_stock) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&product.name)
    .bind(product.price)
    .bind(product.original_price.unwrap_or(product.price))
    .bind(&product.category)
    .bind(&product.description)
    .bind(&product.features)
    .bind(&product.color)
    .bind(&product.image_url)
    .bind(product.discount)
    .bind(product.in_stock)
    .execute(pool)
    .await?;

    Ok(())
}
