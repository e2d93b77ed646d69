//! Error types for the billing flows.
//!
//! `WebhookError` covers everything that fails a webhook delivery before
//! classification. `ReconcileError` covers per-event processing failures,
//! which are logged and acknowledged rather than surfaced to Stripe.
//! `PortalError` covers the customer portal bridge.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorKind};

/// Errors that reject a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// No `Stripe-Signature` header on the request.
    #[error("Missing signature header")]
    MissingSignature,

    /// Header present but `t` or `v1` cannot be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedSignature(String),

    /// No `v1` entry matches the expected HMAC.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature timestamp outside the accepted window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed body is not a Stripe event, or a handled event lacks its fields.
    #[error("Malformed event body: {0}")]
    MalformedBody(String),

    /// Webhook secret not configured.
    #[error("Webhook verification misconfigured: {0}")]
    Configuration(String),
}

impl WebhookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebhookError::MissingSignature
            | WebhookError::MalformedSignature(_)
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange => ErrorKind::Signature,
            WebhookError::MalformedBody(_) => ErrorKind::Validation,
            WebhookError::Configuration(_) => ErrorKind::Config,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::MalformedSignature(_) => "MALFORMED_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::TimestampOutOfRange => "TIMESTAMP_OUT_OF_RANGE",
            WebhookError::MalformedBody(_) => "MALFORMED_BODY",
            WebhookError::Configuration(_) => "CONFIG_ERROR",
        }
    }
}

/// Failures applying a verified event. Never fail the delivery.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    /// The Stripe customer no longer exists.
    #[error("Customer {customer_id} not found")]
    CustomerNotFound { customer_id: String },

    /// The customer carries no usable `user_id` metadata.
    #[error("Customer {customer_id} has no user_id metadata")]
    MissingUserMetadata { customer_id: String },

    /// Stripe lookup failed.
    #[error("Billing provider error: {0}")]
    Billing(String),

    /// Profile write failed.
    #[error("Profile store error: {0}")]
    Store(#[from] DomainError),
}

/// User-facing text when the caller has never paid.
pub const NO_BILLING_ACCOUNT_MESSAGE: &str =
    "No billing account found. Please make a donation first to manage your subscription.";

/// Errors from the customer portal bridge. Authentication failures are
/// rejected by the HTTP auth layer before the bridge runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    #[error("{}", NO_BILLING_ACCOUNT_MESSAGE)]
    NoBillingAccount,

    #[error("Billing provider error: {0}")]
    Upstream(String),
}

impl PortalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortalError::NoBillingAccount => ErrorKind::NotFound,
            PortalError::Upstream(_) => ErrorKind::Upstream,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PortalError::NoBillingAccount => "NO_BILLING_ACCOUNT",
            PortalError::Upstream(_) => "UPSTREAM_ERROR",
        }
    }
}
