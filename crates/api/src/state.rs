//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::payments::{PaymentError, PaymentGateway, StripeClient};
use crate::services::token::TokenSessions;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    tokens: TokenSessions,
    gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create a new application state with the production payment gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway HTTP client cannot be built.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, PaymentError> {
        let gateway = Arc::new(StripeClient::new(&config)?);
        Ok(Self::with_gateway(config, pool, gateway))
    }

    /// Create a new application state with an explicit payment gateway.
    #[must_use]
    pub fn with_gateway(
        config: ApiConfig,
        pool: PgPool,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let tokens = TokenSessions::from_config(&config);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                gateway,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the session-token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenSessions {
        &self.inner.tokens
    }

    /// Get a reference to the payment gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.inner.gateway.as_ref()
    }
}
