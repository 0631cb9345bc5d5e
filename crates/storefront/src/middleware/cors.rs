//! CORS configuration for browser front-ends.
//!
//! The cart rides on the session cookie, so a cross-origin front-end needs
//! credentialed CORS. Browsers refuse to pair credentials with a wildcard
//! origin, which rules out a permissive layer here: the allowed origins
//! come from configuration and are echoed back exactly.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::StorefrontConfig;

/// Build the CORS layer from the configured origin allow-list.
///
/// With no configured origins the layer emits no CORS headers at all, so
/// browsers only permit same-origin requests.
#[must_use]
pub fn create_cors_layer(config: &StorefrontConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::IpAddr;
    use std::path::PathBuf;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;

    fn test_config(cors_origins: Vec<String>) -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse::<IpAddr>().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            asset_root: PathBuf::from("data/assets"),
            cors_origins,
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    fn test_app(config: &StorefrontConfig) -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(create_cors_layer(config))
    }

    #[tokio::test]
    async fn test_configured_origin_gets_credentialed_headers() {
        let config = test_config(vec!["https://shop.dopetechnp.com".to_string()]);

        let response = test_app(&config)
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("Origin", "https://shop.dopetechnp.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .map(|v| v.to_str().unwrap()),
            Some("https://shop.dopetechnp.com")
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-credentials")
                .map(|v| v.to_str().unwrap()),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_unlisted_origin_gets_no_allow_header() {
        let config = test_config(vec!["https://shop.dopetechnp.com".to_string()]);

        let response = test_app(&config)
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("Origin", "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get("access-control-allow-origin")
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_no_configured_origins_emits_no_cors_headers() {
        let config = test_config(Vec::new());

        let response = test_app(&config)
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("Origin", "https://shop.dopetechnp.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get("access-control-allow-origin")
                .is_none()
        );
        assert!(
            response
                .headers()
                .get("access-control-allow-credentials")
                .is_none()
        );
    }
}
