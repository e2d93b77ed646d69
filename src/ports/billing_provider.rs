//! Billing provider port for the payment processor (Stripe).
//!
//! Covers the reads the webhook reconciler needs and the portal session the
//! customer portal bridge creates. Checkout and subscription management
//! happen elsewhere.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::billing::PortalFeatures;
use crate::domain::foundation::UserId;

#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Get customer by provider ID. `None` if it does not exist or was deleted.
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, BillingError>;

    /// Customers whose `user_id` metadata equals `user_id`, newest first.
    async fn search_customers_by_user(&self, user_id: &UserId)
        -> Result<Vec<Customer>, BillingError>;

    /// Create a billing portal session for subscription management.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
        features: &PortalFeatures,
    ) -> Result<PortalSession, BillingError>;
}

/// Customer in the payment system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Provider's customer ID.
    pub id: String,

    pub email: Option<String>,

    /// Our user id, from the customer's `metadata.user_id`.
    pub user_id: Option<String>,
}

/// Portal session for subscription management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to access portal.
    pub url: String,
}

/// Errors from billing provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingError {
    pub code: BillingErrorCode,
    pub message: String,
    /// Provider's error code (if available).
    pub provider_code: Option<String>,
}

impl BillingError {
    pub fn new(code: BillingErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::AuthenticationError, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::ProviderError, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(BillingErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for BillingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,
    /// API key rejected.
    AuthenticationError,
    NotFound,
    RateLimitExceeded,
    /// Provider API error.
    ProviderError,
}

impl BillingErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BillingErrorCode::NetworkError | BillingErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for BillingErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BillingErrorCode::NetworkError => "network_error",
            BillingErrorCode::AuthenticationError => "authentication_error",
            BillingErrorCode::NotFound => "not_found",
            BillingErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            BillingErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
