//! Cart route handlers.
//!
//! The cart lives in the session: one entry holding the JSON-serialized
//! line array, hydrated at the top of each handler and rewritten after
//! every mutation. Hydration tolerates a corrupted entry by starting from
//! an empty cart; persistence failures are logged and swallowed, so the
//! in-memory cart stays authoritative for the request either way.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use dopetech_core::cart::{Cart, CartLine, VariantSelection};
use dopetech_core::{ProductId, format_npr};

use crate::db::ProductRepository;
use crate::error::Result;
use crate::state::AppState;

/// Session key holding the serialized cart.
const CART_KEY: &str = "cart";

/// Cart state returned by every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartLine>,
    pub count: u32,
    pub total: Decimal,
    pub total_formatted: String,
}

impl CartSummary {
    fn build(cart: &Cart) -> Self {
        Self {
            items: cart.lines().to_vec(),
            count: cart.count(),
            total: cart.total(),
            total_formatted: format_npr(cart.total()),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Hydrate the cart from the session, recovering silently from corruption.
async fn load_cart(session: &Session) -> Cart {
    match session.get::<String>(CART_KEY).await {
        Ok(Some(raw)) => Cart::from_json(&raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding corrupted cart entry: {e}");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!("Failed to read cart from session: {e}");
            Cart::new()
        }
    }
}

/// Persist the cart to the session. Failures are logged and swallowed;
/// the in-memory cart remains the source of truth for this request.
async fn save_cart(session: &Session, cart: &Cart) {
    match cart.to_json() {
        Ok(json) => {
            if let Err(e) = session.insert(CART_KEY, json).await {
                tracing::error!("Failed to persist cart to session: {e}");
            }
        }
        Err(e) => tracing::error!("Failed to serialize cart: {e}"),
    }
}

/// Drop the persisted cart entry (checkout completion or manual clear).
pub(crate) async fn clear_persisted_cart(session: &Session) {
    if let Err(e) = session.remove::<String>(CART_KEY).await {
        tracing::error!("Failed to clear persisted cart: {e}");
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub selected_color: Option<String>,
    #[serde(default)]
    pub selected_features: Vec<String>,
}

const fn default_quantity() -> u32 {
    1
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove product request body.
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub product_id: ProductId,
}

/// Overwrite selection request body.
#[derive(Debug, Deserialize)]
pub struct SelectionsRequest {
    pub product_id: ProductId,
    pub selected_color: Option<String>,
    #[serde(default)]
    pub selected_features: Vec<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart state.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartSummary> {
    let cart = load_cart(&session).await;
    Json(CartSummary::build(&cart))
}

/// Add a product to the cart, merging with an existing line when the
/// variant selection matches.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartSummary>> {
    // Snapshot catalog fields at add time; the cart never re-reads them.
    let product = ProductRepository::new(state.pool())
        .get(body.product_id)
        .await?;

    let selection = VariantSelection {
        color: body.selected_color,
        features: body.selected_features,
    };

    let mut cart = load_cart(&session).await;
    cart.add_product(&product, body.quantity, selection);
    save_cart(&session, &cart).await;

    Ok(Json(CartSummary::build(&cart)))
}

/// Set the quantity on the first line for a product; 0 removes it.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(body): Json<UpdateQuantityRequest>,
) -> Json<CartSummary> {
    let mut cart = load_cart(&session).await;
    cart.set_quantity(body.product_id, body.quantity);
    save_cart(&session, &cart).await;

    Json(CartSummary::build(&cart))
}

/// Remove every line for a product, across all variants.
#[instrument(skip(session))]
pub async fn remove(session: Session, Json(body): Json<RemoveRequest>) -> Json<CartSummary> {
    let mut cart = load_cart(&session).await;
    cart.remove_product(body.product_id);
    save_cart(&session, &cart).await;

    Json(CartSummary::build(&cart))
}

/// Overwrite the variant selection on the first line for a product.
#[instrument(skip(session))]
pub async fn selections(
    session: Session,
    Json(body): Json<SelectionsRequest>,
) -> Json<CartSummary> {
    let selection = VariantSelection {
        color: body.selected_color,
        features: body.selected_features,
    };

    let mut cart = load_cart(&session).await;
    cart.set_selection(body.product_id, selection);
    save_cart(&session, &cart).await;

    Json(CartSummary::build(&cart))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Json<CartSummary> {
    clear_persisted_cart(&session).await;
    Json(CartSummary::build(&Cart::new()))
}

/// Unit count only (badge endpoint).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<serde_json::Value> {
    let cart = load_cart(&session).await;
    Json(serde_json::json!({ "count": cart.count() }))
}
