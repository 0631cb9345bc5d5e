//! Order route handlers.
//!
//! Checkout runs as a best-effort pipeline: the order row is the anchor
//! and is inserted first; item rows, receipt storage, and email dispatch
//! follow, each logging its own failure without undoing earlier steps.
//! A half-finished order with a row but missing items is visible in the
//! admin listing and preferable to silently losing the sale.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use dopetech_core::{Order, OrderId, OrderItem, OrderStatus, PaymentOption, ProductId};

use crate::db::{NewOrder, NewOrderItem, OrderRepository};
use crate::error::{AppError, Result};
use crate::services::storage::AssetStorage;
use crate::state::AppState;

/// Bucket for uploaded payment receipts.
const RECEIPT_BUCKET: &str = "receipts";

/// Characters used for generated order references. Ambiguous glyphs
/// (0/O, 1/I/L) are excluded so references survive being read aloud.
const REFERENCE_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

fn generate_order_reference() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| REFERENCE_CHARSET[rng.random_range(0..REFERENCE_CHARSET.len())] as char)
        .collect();
    format!("DTN-{suffix}")
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// One line in the checkout payload. Mirrors the cart line shape.
#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
    pub selected_color: Option<String>,
    #[serde(default)]
    pub selected_features: Vec<String>,
}

/// Base64-encoded payment receipt attached to a deposit checkout.
#[derive(Debug, Deserialize)]
pub struct ReceiptUpload {
    pub file_name: String,
    /// Base64 payload, with or without a `data:` URL prefix.
    pub data: String,
}

impl ReceiptUpload {
    /// Decode the payload, tolerating a `data:<type>;base64,` prefix.
    fn decode(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        let raw = match self.data.split_once(',') {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => self.data.as_str(),
        };
        BASE64.decode(raw)
    }
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Generated server-side when absent.
    pub order_reference: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: String,
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    pub receiver_address: Option<String>,
    pub receiver_city: Option<String>,
    pub items: Vec<CheckoutItem>,
    pub total: Decimal,
    pub payment_option: PaymentOption,
    pub receipt: Option<ReceiptUpload>,
}

/// Checkout response body.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_db_id: OrderId,
    pub order_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

/// Order with its item rows, for listing and detail responses.
#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an order from a checkout payload.
#[instrument(skip(state, session, body), fields(reference = tracing::field::Empty))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    if body.items.is_empty() {
        return Err(AppError::BadRequest("Cannot checkout an empty cart".into()));
    }

    let reference = body
        .order_reference
        .clone()
        .unwrap_or_else(generate_order_reference);
    tracing::Span::current().record("reference", reference.as_str());

    let repo = OrderRepository::new(state.pool());

    // Step 1: the order row. This is the only step that can fail checkout.
    let order = repo
        .create(&NewOrder {
            order_reference: reference.clone(),
            customer_name: body.customer_name,
            customer_email: body.customer_email,
            customer_phone: body.customer_phone,
            customer_address: body.customer_address,
            customer_city: body.customer_city,
            receiver_name: body.receiver_name,
            receiver_phone: body.receiver_phone,
            receiver_address: body.receiver_address,
            receiver_city: body.receiver_city,
            total: body.total,
            payment_option: body.payment_option,
        })
        .await?;

    // Step 2: item rows, one at a time. An insert failure leaves the
    // order row in place; the gap shows up in the order listing.
    for item in &body.items {
        let result = repo
            .add_item(
                order.id,
                &NewOrderItem {
                    product_id: item.id,
                    name: item.name.clone(),
                    price: item.price,
                    quantity: i32::try_from(item.quantity).unwrap_or(i32::MAX),
                    image_url: item.image.clone(),
                    selected_color: item.selected_color.clone(),
                    selected_features: item.selected_features.clone(),
                },
            )
            .await;

        if let Err(e) = result {
            tracing::error!(
                order_reference = %reference,
                product_id = %item.id,
                "Failed to insert order item: {e}"
            );
        }
    }

    // Step 3: receipt storage.
    let receipt_url = match body.receipt {
        Some(receipt) => store_receipt(&state, &repo, &order, &receipt).await,
        None => None,
    };

    // Step 4: email dispatch.
    if let Some(email) = state.email() {
        let items = repo.items(order.id).await.unwrap_or_default();
        let mut order_for_mail = order.clone();
        order_for_mail.receipt_url.clone_from(&receipt_url);

        if let Err(e) = email.send_order_emails(&order_for_mail, &items).await {
            tracing::error!(
                order_reference = %reference,
                "Failed to send order emails: {e}"
            );
        }
    }

    // The session cart is spent once the order row exists.
    super::cart::clear_persisted_cart(&session).await;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            success: true,
            order_db_id: order.id,
            order_reference: reference,
            receipt_url,
        }),
    ))
}

/// Decode, store, and record the receipt. Any failure is logged against
/// the order reference and leaves the order without a receipt URL.
async fn store_receipt(
    state: &AppState,
    repo: &OrderRepository<'_>,
    order: &Order,
    receipt: &ReceiptUpload,
) -> Option<String> {
    let bytes = match receipt.decode() {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(
                order_reference = %order.order_reference,
                "Failed to decode receipt payload: {e}"
            );
            return None;
        }
    };

    let object_name = AssetStorage::object_name(&receipt.file_name);
    let url = match state
        .storage()
        .save(RECEIPT_BUCKET, &object_name, &bytes)
        .await
    {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(
                order_reference = %order.order_reference,
                "Failed to store receipt: {e}"
            );
            return None;
        }
    };

    if let Err(e) = repo.set_receipt_url(order.id, &url).await {
        tracing::error!(
            order_reference = %order.order_reference,
            "Failed to record receipt URL: {e}"
        );
    }

    Some(url)
}

/// List all orders with their items, newest first.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderWithItems>>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list().await?;

    let mut out = Vec::with_capacity(orders.len());
    for order in orders {
        let items = repo.items(order.id).await?;
        out.push(OrderWithItems { order, items });
    }

    Ok(Json(out))
}

/// Fetch a single order with its items.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo.get(id).await?;
    let items = repo.items(id).await?;

    Ok(Json(OrderWithItems { order, items }))
}

/// Update an order's status.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .set_status(id, body.status)
        .await?;

    Ok(Json(order))
}

/// (Re)send the confirmation emails for an existing order.
#[instrument(skip(state))]
pub async fn send_email(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let Some(email) = state.email() else {
        return Err(AppError::BadRequest(
            "Email delivery is not configured".into(),
        ));
    };

    let repo = OrderRepository::new(state.pool());
    let order = repo.get(id).await?;
    let items = repo.items(id).await?;

    email.send_order_emails(&order, &items).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_reference_shape() {
        let reference = generate_order_reference();
        assert!(reference.starts_with("DTN-"));
        assert_eq!(reference.len(), 10);
        assert!(
            reference[4..]
                .bytes()
                .all(|b| REFERENCE_CHARSET.contains(&b))
        );
    }

    #[test]
    fn test_receipt_decode_plain_base64() {
        let receipt = ReceiptUpload {
            file_name: "receipt.png".into(),
            data: BASE64.encode(b"binary receipt"),
        };
        assert_eq!(receipt.decode().unwrap(), b"binary receipt");
    }

    #[test]
    fn test_receipt_decode_data_url() {
        let receipt = ReceiptUpload {
            file_name: "receipt.png".into(),
            data: format!("data:image/png;base64,{}", BASE64.encode(b"binary receipt")),
        };
        assert_eq!(receipt.decode().unwrap(), b"binary receipt");
    }

    #[test]
    fn test_receipt_decode_rejects_garbage() {
        let receipt = ReceiptUpload {
            file_name: "receipt.png".into(),
            data: "not base64 at all!!!".into(),
        };
        assert!(receipt.decode().is_err());
    }

    #[test]
    fn test_checkout_request_deserializes() {
        let body: CheckoutRequest = serde_json::from_str(
            r#"{
                "customer_name": "Aarav Shrestha",
                "customer_email": "aarav@example.com",
                "customer_phone": "+977-9800000000",
                "customer_address": "Thamel",
                "customer_city": "Kathmandu",
                "items": [{
                    "id": 1,
                    "name": "Ajazz AK820 Pro",
                    "price": "4999",
                    "quantity": 2,
                    "image": null,
                    "selected_color": "Black",
                    "selected_features": ["RGB", "Hot-swap"]
                }],
                "total": "9998",
                "payment_option": "full"
            }"#,
        )
        .unwrap();

        assert!(body.order_reference.is_none());
        assert!(body.receipt.is_none());
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].quantity, 2);
        assert_eq!(body.payment_option, PaymentOption::Full);
    }
}
