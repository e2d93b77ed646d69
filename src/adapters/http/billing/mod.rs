//! HTTP adapter for billing endpoints.
//!
//! - `POST /api/billing/portal` - Get a Stripe customer portal URL
//! - `POST /api/webhooks/stripe` - Handle Stripe webhooks

mod dto;
mod handlers;
mod routes;

pub use dto::{PortalResponse, WebhookAck};
pub use handlers::STRIPE_SIGNATURE_HEADER;
pub use routes::{billing_routes, webhook_routes};
