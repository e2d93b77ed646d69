//! Application router and shared state.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::billing::{billing_routes, webhook_routes};
use super::health::health_routes;
use super::steam::steam_routes;
use crate::application::handlers::billing::{OpenCustomerPortalHandler, ReconcileWebhookHandler};
use crate::application::handlers::steam::{
    CompleteSteamLinkHandler, InitiateSteamLinkHandler, SteamLinkSettings,
};
use crate::config::ServerConfig;
use crate::domain::billing::{DonorPolicy, PortalFeatures, StripeWebhookVerifier};
use crate::ports::{BillingProvider, OpenIdVerifier, SessionValidator, UserStore};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub session_validator: Arc<dyn SessionValidator>,
    pub user_store: Arc<dyn UserStore>,
    pub billing_provider: Arc<dyn BillingProvider>,
    pub openid_verifier: Arc<dyn OpenIdVerifier>,
    pub webhook_verifier: Arc<StripeWebhookVerifier>,
    pub steam: SteamLinkSettings,
    pub donor_policy: DonorPolicy,
    pub portal_return_url: String,
    pub portal_features: PortalFeatures,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn initiate_steam_link_handler(&self) -> InitiateSteamLinkHandler {
        InitiateSteamLinkHandler::new(self.steam.clone())
    }

    pub fn complete_steam_link_handler(&self) -> CompleteSteamLinkHandler {
        CompleteSteamLinkHandler::new(
            self.steam.clone(),
            self.openid_verifier.clone(),
            self.session_validator.clone(),
            self.user_store.clone(),
        )
    }

    pub fn reconcile_webhook_handler(&self) -> ReconcileWebhookHandler {
        ReconcileWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.donor_policy,
            self.billing_provider.clone(),
            self.user_store.clone(),
        )
    }

    pub fn open_customer_portal_handler(&self) -> OpenCustomerPortalHandler {
        OpenCustomerPortalHandler::new(
            self.billing_provider.clone(),
            self.portal_return_url.clone(),
            self.portal_features.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Router
// ════════════════════════════════════════════════════════════════════════════════

/// All routes, without transport layers.
///
/// # Routes
/// - `GET /health`
/// - `GET /api/steam/auth`
/// - `POST /api/webhooks/stripe`
/// - `POST /api/billing/portal`
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/steam", steam_routes())
        .nest("/webhooks", webhook_routes())
        .nest("/billing", billing_routes(state.session_validator.clone()));

    Router::new()
        .merge(health_routes())
        .nest("/api", api)
        .with_state(state)
}

/// The router as served: tracing, CORS and request timeout applied.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    api_router(state)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.allowed_origins()))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
