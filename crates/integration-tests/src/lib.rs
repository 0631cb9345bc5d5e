//! Integration tests for the DopeTech storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p dopetech-cli -- migrate
//!
//! # Start the server
//! cargo run -p dopetech-storefront
//!
//! # Run integration tests
//! cargo test -p dopetech-integration-tests -- --ignored
//! ```
//!
//! Each test file targets one API area: products, cart, checkout, hero
//! images. Tests are `#[ignore]`d by default because they need a running
//! server and a migrated database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("DOPETECH_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a client with a cookie store so the session (and with it the
/// cart) persists across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed; tests cannot proceed
/// without one.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Parse a string-encoded decimal field for comparison. Monetary values
/// travel as JSON strings and the scale of database-roundtripped values
/// varies ("200" vs "200.00"), so tests compare the parsed number.
///
/// # Panics
///
/// Panics if the value is not a string holding a number; that is a test
/// failure in itself.
#[must_use]
pub fn decimal(value: &serde_json::Value) -> f64 {
    value
        .as_str()
        .expect("expected string-encoded decimal")
        .parse()
        .expect("expected numeric string")
}
