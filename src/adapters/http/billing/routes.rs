//! Axum router configuration for billing endpoints.

use axum::{middleware, routing::post, Router};

use super::handlers::{open_portal, stripe_webhook};
use crate::adapters::http::middleware::{auth_middleware, AuthState};
use crate::adapters::http::router::AppState;

/// Create the billing router, mounted at `/api/billing`.
///
/// # Routes
/// - `POST /portal` - Customer portal session (requires authentication)
pub fn billing_routes(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/portal", post(open_portal))
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware))
}

/// Create the Stripe webhook router, mounted at `/api/webhooks`.
///
/// Separate from the billing routes because webhooks don't carry a user
/// session; they're verified via signature.
///
/// # Routes
/// - `POST /stripe` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(stripe_webhook))
}
