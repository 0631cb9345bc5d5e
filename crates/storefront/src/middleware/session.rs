//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The session
//! record is the cart's durable storage: one entry holding the serialized
//! line array, rewritten after every cart mutation.

use cookie::Key;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "dt_session";

/// Session expiry time in seconds (30 days; carts survive casual absence).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Derive the cookie signing key from the configured session secret.
///
/// `Key::derive_from` requires at least 32 bytes of input; configuration
/// loading rejects shorter secrets before this runs.
fn signing_key(secret: &SecretString) -> Key {
    Key::derive_from(secret.expose_secret().as_bytes())
}

/// Create the session layer with `PostgreSQL` store and signed cookies.
///
/// The `session` table must be created via migration before serving.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    let store = PostgresStore::new(pool.clone());

    // Secure cookies only when actually served over HTTPS
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(&config.session_secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_is_deterministic() {
        let secret = SecretString::from("a".repeat(32));
        assert_eq!(signing_key(&secret), signing_key(&secret));
    }

    #[test]
    fn test_signing_key_differs_per_secret() {
        let first = SecretString::from("a".repeat(32));
        let second = SecretString::from("b".repeat(32));
        assert_ne!(signing_key(&first), signing_key(&second));
    }

    #[test]
    fn test_signing_key_accepts_minimum_length_secret() {
        // The shortest secret configuration loading allows.
        let secret = SecretString::from("x".repeat(32));
        let key = signing_key(&secret);
        assert!(!key.signing().is_empty());
    }
}
