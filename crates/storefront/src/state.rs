//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use dopetech_core::HeroImage;

use crate::config::StorefrontConfig;
use crate::services::email::EmailService;
use crate::services::storage::AssetStorage;

/// How long the hero carousel listing may be served from cache.
const HERO_CACHE_TTL: Duration = Duration::from_secs(60);

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("smtp configuration error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    storage: AssetStorage,
    email: Option<EmailService>,
    hero_cache: Cache<(), Arc<Vec<HeroImage>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Email is optional: without SMTP configuration the service runs with
    /// outbound mail disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay configuration is invalid.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let storage = AssetStorage::new(config.asset_root.clone(), &config.base_url);

        let email = match &config.email {
            Some(email_config) => Some(EmailService::new(email_config)?),
            None => {
                tracing::warn!("SMTP not configured; order emails are disabled");
                None
            }
        };

        let hero_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(HERO_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                storage,
                email,
                hero_cache,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the asset storage backend.
    #[must_use]
    pub fn storage(&self) -> &AssetStorage {
        &self.inner.storage
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Get the hero carousel listing cache.
    #[must_use]
    pub fn hero_cache(&self) -> &Cache<(), Arc<Vec<HeroImage>>> {
        &self.inner.hero_cache
    }
}
