//! Transactional email for order confirmations.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Two mails
//! go out per order: a confirmation to the customer and a notification to
//! the shop inbox. Dispatch failures never roll back the order record;
//! callers log and move on.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use dopetech_core::{Order, OrderItem, PaymentOption, format_npr};

use crate::config::EmailConfig;

/// Pre-formatted order line for templates.
struct ItemView {
    name: String,
    quantity: i32,
    line_total: String,
    variant: String,
}

/// Pre-formatted order summary for templates.
struct OrderView {
    order_reference: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    delivery_address: String,
    total: String,
    payment_label: &'static str,
    items: Vec<ItemView>,
}

/// HTML template for the customer confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order: &'a OrderView,
}

/// Plain text template for the customer confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order: &'a OrderView,
}

/// HTML template for the shop notification email.
#[derive(Template)]
#[template(path = "email/order_notification.html")]
struct OrderNotificationHtml<'a> {
    order: &'a OrderView,
    receipt_url: Option<&'a str>,
}

/// Plain text template for the shop notification email.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    order: &'a OrderView,
    receipt_url: Option<&'a str>,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    admin_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay configuration is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            admin_address: config.admin_address.clone(),
        })
    }

    /// Send the order confirmation to the customer and the new-order
    /// notification to the shop inbox.
    ///
    /// The two sends are independent; a customer-mail failure is returned
    /// after still attempting the shop notification.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered (send or template render).
    pub async fn send_order_emails(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> Result<(), EmailError> {
        let view = OrderView::build(order, items);

        let customer_result = self.send_confirmation(&order.customer_email, &view).await;
        let admin_result = self
            .send_notification(&view, order.receipt_url.as_deref())
            .await;

        customer_result.and(admin_result)
    }

    async fn send_confirmation(&self, to: &str, order: &OrderView) -> Result<(), EmailError> {
        let html = OrderConfirmationHtml { order }.render()?;
        let text = OrderConfirmationText { order }.render()?;

        self.send_multipart_email(
            to,
            &format!("Your DopeTech order {}", order.order_reference),
            &text,
            &html,
        )
        .await
    }

    async fn send_notification(
        &self,
        order: &OrderView,
        receipt_url: Option<&str>,
    ) -> Result<(), EmailError> {
        let html = OrderNotificationHtml { order, receipt_url }.render()?;
        let text = OrderNotificationText { order, receipt_url }.render()?;

        self.send_multipart_email(
            &self.admin_address,
            &format!("New order {}", order.order_reference),
            &text,
            &html,
        )
        .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

impl OrderView {
    fn build(order: &Order, items: &[OrderItem]) -> Self {
        Self {
            order_reference: order.order_reference.clone(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            customer_phone: order.customer_phone.clone(),
            delivery_address: delivery_address(order),
            total: format_npr(order.total),
            payment_label: match order.payment_option {
                PaymentOption::Full => "Paid in full",
                PaymentOption::Deposit => "Deposit paid, balance due on delivery",
            },
            items: items.iter().map(ItemView::build).collect(),
        }
    }
}

impl ItemView {
    fn build(item: &OrderItem) -> Self {
        let mut variant_parts = Vec::new();
        if let Some(color) = &item.selected_color {
            variant_parts.push(format!("Color: {color}"));
        }
        if !item.selected_features.is_empty() {
            variant_parts.push(item.selected_features.join(", "));
        }

        Self {
            name: item.name.clone(),
            quantity: item.quantity,
            line_total: format_npr(item.price * rust_decimal::Decimal::from(item.quantity)),
            variant: variant_parts.join(" / "),
        }
    }
}

/// Ship-to block: the receiver when one was given, the customer otherwise.
fn delivery_address(order: &Order) -> String {
    match (&order.receiver_name, &order.receiver_address) {
        (Some(name), Some(address)) => {
            let city = order.receiver_city.as_deref().unwrap_or_default();
            format!("{name}, {address}, {city}")
        }
        _ => format!(
            "{}, {}, {}",
            order.customer_name, order.customer_address, order.customer_city
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dopetech_core::{OrderId, OrderItemId, OrderStatus, ProductId};
    use rust_decimal::Decimal;

    fn sample_order() -> Order {
        Order {
            id: OrderId::new(1),
            order_reference: "DTN-A1B2C3".to_string(),
            customer_name: "Sita Sharma".to_string(),
            customer_email: "sita@example.com".to_string(),
            customer_phone: "9800000000".to_string(),
            customer_address: "Baneshwor".to_string(),
            customer_city: "Kathmandu".to_string(),
            receiver_name: None,
            receiver_phone: None,
            receiver_address: None,
            receiver_city: None,
            total: Decimal::new(13_000, 0),
            payment_option: PaymentOption::Deposit,
            status: OrderStatus::Pending,
            receipt_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_items() -> Vec<OrderItem> {
        vec![OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(7),
            name: "Ajazz AK820 Pro".to_string(),
            price: Decimal::new(6500, 0),
            quantity: 2,
            image_url: None,
            selected_color: Some("Black".to_string()),
            selected_features: vec!["Tri-mode".to_string()],
        }]
    }

    #[test]
    fn test_confirmation_templates_render() {
        let order = sample_order();
        let items = sample_items();
        let view = OrderView::build(&order, &items);

        let html = OrderConfirmationHtml { order: &view }
            .render()
            .expect("html renders");
        let text = OrderConfirmationText { order: &view }
            .render()
            .expect("text renders");

        for body in [&html, &text] {
            assert!(body.contains("DTN-A1B2C3"));
            assert!(body.contains("Ajazz AK820 Pro"));
            assert!(body.contains("Rs 13,000.00"));
            assert!(body.contains("Color: Black"));
        }
    }

    #[test]
    fn test_notification_template_includes_receipt_link() {
        let order = sample_order();
        let items = sample_items();
        let view = OrderView::build(&order, &items);

        let html = OrderNotificationHtml {
            order: &view,
            receipt_url: Some("http://localhost:3000/files/receipts/x.png"),
        }
        .render()
        .expect("html renders");

        assert!(html.contains("/files/receipts/x.png"));
        assert!(html.contains("sita@example.com"));
    }

    #[test]
    fn test_delivery_address_prefers_receiver() {
        let mut order = sample_order();
        order.receiver_name = Some("Hari".to_string());
        order.receiver_address = Some("Lakeside".to_string());
        order.receiver_city = Some("Pokhara".to_string());

        assert_eq!(delivery_address(&order), "Hari, Lakeside, Pokhara");
    }

    #[test]
    fn test_delivery_address_falls_back_to_customer() {
        let order = sample_order();
        assert_eq!(delivery_address(&order), "Sita Sharma, Baneshwor, Kathmandu");
    }
}
