//! Billing handlers.
//!
//! ## Commands
//! - Reconciling Stripe webhook deliveries into donor status
//! - Opening the Stripe customer portal

mod open_customer_portal;
mod reconcile_webhook;

pub use open_customer_portal::{
    OpenCustomerPortalCommand, OpenCustomerPortalHandler, OpenCustomerPortalResult,
};
pub use reconcile_webhook::{
    ReconcileOutcome, ReconcileWebhookCommand, ReconcileWebhookHandler, ReconcileWebhookResult,
};
