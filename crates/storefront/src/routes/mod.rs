//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Products
//! GET    /api/products             - Product listing (?category=)
//! POST   /api/products             - Create product
//! GET    /api/products/{id}        - Product detail
//! PATCH  /api/products/{id}        - Partial update
//! DELETE /api/products/{id}        - Delete product
//! GET    /api/products/{id}/images - Gallery images
//! POST   /api/products/{id}/images - Add gallery image
//! DELETE /api/products/{id}/images/{image_id} - Remove gallery image
//!
//! # Hero carousel
//! GET    /api/hero-images          - List slides (cached)
//! POST   /api/hero-images          - Create slide
//! PUT    /api/hero-images/{id}     - Replace slide
//! DELETE /api/hero-images/{id}     - Delete slide
//!
//! # Payment QR codes
//! GET    /api/qr-codes             - List codes (?active=true)
//! POST   /api/qr-codes             - Create code
//! PATCH  /api/qr-codes/{id}        - Rename / toggle active
//! DELETE /api/qr-codes/{id}        - Delete code
//!
//! # Cart (session-backed)
//! GET  /api/cart                   - Lines + count + total
//! POST /api/cart/add               - Add product (merges variants)
//! POST /api/cart/update            - Set quantity (0 removes)
//! POST /api/cart/remove            - Remove product (all variants)
//! POST /api/cart/selections        - Overwrite variant selection
//! POST /api/cart/clear             - Empty the cart
//! GET  /api/cart/count             - Unit count only
//!
//! # Orders
//! POST  /api/orders/checkout       - Submit an order
//! GET   /api/orders                - List orders with items
//! GET   /api/orders/{id}           - Order detail with items
//! PATCH /api/orders/{id}           - Update status
//! POST  /api/orders/{id}/send-email - (Re)send confirmation email
//!
//! # Assets
//! POST   /api/assets               - Multipart upload into a bucket
//! GET    /api/assets               - List uploads (?bucket=)
//! DELETE /api/assets/{id}          - Delete upload
//! ```
//!
//! All failure responses share the `{ "error": string }` JSON shape;
//! success shapes vary per resource.

pub mod assets;
pub mod cart;
pub mod hero_images;
pub mod orders;
pub mod products;
pub mod qr_codes;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::destroy),
        )
        .route(
            "/{id}/images",
            get(products::list_images).post(products::add_image),
        )
        .route("/{id}/images/{image_id}", delete(products::delete_image))
}

/// Create the hero carousel routes router.
pub fn hero_image_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(hero_images::list).post(hero_images::create))
        .route(
            "/{id}",
            axum::routing::put(hero_images::update).delete(hero_images::destroy),
        )
}

/// Create the payment QR code routes router.
pub fn qr_code_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(qr_codes::list).post(qr_codes::create))
        .route("/{id}", patch(qr_codes::update).delete(qr_codes::destroy))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/selections", post(cart::selections))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/checkout", post(orders::checkout))
        .route("/{id}", get(orders::show).patch(orders::update_status))
        .route("/{id}/send-email", post(orders::send_email))
}

/// Create the asset routes router.
pub fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list).post(assets::upload))
        .route("/{id}", delete(assets::destroy))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/hero-images", hero_image_routes())
        .nest("/api/qr-codes", qr_code_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/assets", asset_routes())
}
