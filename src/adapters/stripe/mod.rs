//! Stripe billing provider adapter.
//!
//! Implements the `BillingProvider` port for Stripe integration:
//! - Customer lookup (webhook reconciliation)
//! - Customer search by `metadata.user_id` (portal bridge)
//! - Billing portal configuration and session creation
//!
//! Webhook signature verification is pure and lives in `domain::billing`.
//! The API key is handled via `secrecy::SecretString`.

mod api_types;
mod mock_billing_provider;
mod stripe_adapter;

pub use api_types::{StripeCustomer, USER_ID_METADATA_KEY};
pub use mock_billing_provider::{MethodCall, MockBillingProvider};
pub use stripe_adapter::{StripeBillingAdapter, StripeConfig};
