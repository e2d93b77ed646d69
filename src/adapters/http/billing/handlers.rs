//! HTTP handlers for billing endpoints.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use super::dto::{PortalResponse, WebhookAck};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::router::AppState;
use crate::application::handlers::billing::{OpenCustomerPortalCommand, ReconcileWebhookCommand};
use crate::domain::foundation::Timestamp;

/// Header Stripe signs deliveries with.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /api/webhooks/stripe - Reconcile a Stripe webhook delivery.
///
/// The body is taken as raw bytes: the signature covers them exactly.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let cmd = ReconcileWebhookCommand {
        payload: body.to_vec(),
        signature,
        received_at: Timestamp::now(),
    };

    state
        .reconcile_webhook_handler()
        .handle(cmd)
        .await
        .map_err(|e| {
            tracing::warn!(code = e.code(), error = %e, "Webhook delivery rejected");
            e
        })?;

    Ok(Json(WebhookAck::received()))
}

/// POST /api/billing/portal - Open the Stripe customer portal.
pub async fn open_portal(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = OpenCustomerPortalCommand { user_id: user.id };

    let result = state.open_customer_portal_handler().handle(cmd).await?;

    Ok(Json(PortalResponse { url: result.url }))
}
