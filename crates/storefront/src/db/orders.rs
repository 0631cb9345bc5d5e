//! Order repository for checkout persistence.
//!
//! Order creation is deliberately best-effort across steps: the order row
//! is inserted first, then item rows one at a time. An item insert failure
//! leaves the order row in place; callers log and continue. See DESIGN.md
//! for the atomicity decision.

use rust_decimal::Decimal;
use sqlx::PgPool;

use dopetech_core::{Order, OrderId, OrderItem, OrderStatus, PaymentOption, ProductId};

use super::RepositoryError;

const ORDER_COLUMNS: &str = "id, order_reference, customer_name, customer_email, customer_phone, \
     customer_address, customer_city, receiver_name, receiver_phone, receiver_address, \
     receiver_city, total, payment_option, status, receipt_url, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, name, price, quantity, image_url, selected_color, selected_features";

/// Fields for creating an order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: String,
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    pub receiver_address: Option<String>,
    pub receiver_city: Option<String>,
    pub total: Decimal,
    pub payment_option: PaymentOption,
}

/// Fields for creating an order item row.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: Option<String>,
    pub selected_color: Option<String>,
    pub selected_features: Vec<String>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert the order row with status `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order reference is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders \
                 (order_reference, customer_name, customer_email, customer_phone, \
                  customer_address, customer_city, receiver_name, receiver_phone, \
                  receiver_address, receiver_city, total, payment_option, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&new.order_reference)
        .bind(&new.customer_name)
        .bind(&new.customer_email)
        .bind(&new.customer_phone)
        .bind(&new.customer_address)
        .bind(&new.customer_city)
        .bind(&new.receiver_name)
        .bind(&new.receiver_phone)
        .bind(&new.receiver_address)
        .bind(&new.receiver_city)
        .bind(new.total)
        .bind(new.payment_option)
        .bind(OrderStatus::Pending)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order reference already exists".to_owned());
            }
            e.into()
        })?;

        Ok(order)
    }

    /// Insert one item row for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails. Callers in
    /// the checkout flow log this and keep going.
    pub async fn add_item(
        &self,
        order_id: OrderId,
        item: &NewOrderItem,
    ) -> Result<OrderItem, RepositoryError> {
        let item = sqlx::query_as::<_, OrderItem>(&format!(
            "INSERT INTO order_items \
                 (order_id, product_id, name, price, quantity, image_url, \
                  selected_color, selected_features) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ORDER_ITEM_COLUMNS}"
        ))
        .bind(order_id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(&item.image_url)
        .bind(&item.selected_color)
        .bind(&item.selected_features)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    pub async fn get(&self, id: OrderId) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// List the items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Attach a receipt URL to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    pub async fn set_receipt_url(
        &self,
        id: OrderId,
        receipt_url: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE orders SET receipt_url = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(receipt_url)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
