//! Payment gateway client.
//!
//! Checkout only ever sees the [`PaymentGateway`] trait: one call that turns
//! an amount into an opaque payment reference. The production implementation
//! talks to Stripe; tests substitute an in-process fake.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::ApiConfig;

/// Stripe API base URL.
const BASE_URL: &str = "https://api.stripe.com/v1";

/// Errors that can occur when interacting with the payment gateway.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("gateway error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the client or parse a response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A freshly created payment intent.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Gateway-side identifier, used for reconciliation.
    pub id: String,
    /// Client-facing reference needed to complete payment out of band.
    pub client_secret: String,
}

/// The slice of the payment gateway the order pipeline depends on.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Reserve a payment intent for `amount` minor units of `currency`.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if the gateway rejects the request or is
    /// unreachable; order creation must be aborted in that case.
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Stripe payment gateway client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: SecretString,
}

impl StripeClient {
    /// Create a new Stripe client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            secret_key: config.stripe_secret_key.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{BASE_URL}/payment_intents");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&[("amount", amount.to_string()), ("currency", currency.to_owned())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        Ok(intent)
    }
}
