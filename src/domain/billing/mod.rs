//! Billing module - Stripe webhook reconciliation and customer portal.
//!
//! Signature verification, event classification and the donor policy are
//! pure; Stripe lookups and profile writes go through ports.

mod policy;
mod portal;
pub mod stripe_event;
mod webhook_errors;
pub mod webhook_verifier;

pub use policy::{Decision, DonorPolicy, DEFAULT_DONATION_PERIOD_DAYS, DEFAULT_REVOKE_THRESHOLD};
pub use portal::{PortalFeatures, PORTAL_EDITABLE_CUSTOMER_FIELDS};
pub use stripe_event::{BillingEvent, StripeEvent};
pub use webhook_errors::{PortalError, ReconcileError, WebhookError, NO_BILLING_ACCOUNT_MESSAGE};
pub use webhook_verifier::{SignatureHeader, StripeWebhookVerifier};
