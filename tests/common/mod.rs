//! Shared wiring for router-level integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

use game_shlf::adapters::auth::MockSessionValidator;
use game_shlf::adapters::http::{api_router, AppState};
use game_shlf::adapters::memory::InMemoryUserStore;
use game_shlf::adapters::steam::MockOpenIdVerifier;
use game_shlf::adapters::stripe::MockBillingProvider;
use game_shlf::application::SteamLinkSettings;
use game_shlf::domain::billing::{DonorPolicy, PortalFeatures, StripeWebhookVerifier};
use game_shlf::domain::foundation::UserId;
use game_shlf::domain::steam::AppOriginPolicy;

pub const SESSION_TOKEN: &str = "session-token";
pub const USER_ID: &str = "5f0c7a3e-2b1d-4c8e-9a6f-1d2e3f4a5b6c";
pub const WEBHOOK_SECRET: &str = "whsec_integration_secret";
pub const STEAM_ID: &str = "76561197960287930";
pub const DEFAULT_ORIGIN: &str = "https://gameshlf.com";

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryUserStore,
    pub billing: MockBillingProvider,
    pub verifier: MockOpenIdVerifier,
}

impl TestApp {
    pub async fn new(verifier: MockOpenIdVerifier) -> Self {
        let store = InMemoryUserStore::new();
        store.insert_user(&user_id()).await;
        let billing = MockBillingProvider::new();

        let state = AppState {
            session_validator: Arc::new(
                MockSessionValidator::new().with_test_user(SESSION_TOKEN, USER_ID),
            ),
            user_store: Arc::new(store.clone()),
            billing_provider: Arc::new(billing.clone()),
            openid_verifier: Arc::new(verifier.clone()),
            webhook_verifier: Arc::new(StripeWebhookVerifier::new(WEBHOOK_SECRET)),
            steam: SteamLinkSettings {
                openid_endpoint: "https://steamcommunity.com/openid/login".to_string(),
                callback_url: "https://api.gameshlf.com/api/steam/auth".to_string(),
                realm: "https://api.gameshlf.com".to_string(),
                origins: AppOriginPolicy::new(
                    vec!["gameshlf.com".to_string(), "localhost".to_string()],
                    DEFAULT_ORIGIN,
                ),
            },
            donor_policy: DonorPolicy::default(),
            portal_return_url: format!("{}/account", DEFAULT_ORIGIN),
            portal_features: PortalFeatures::donor_defaults(),
        };

        Self {
            router: api_router(state),
            store,
            billing,
            verifier,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn user_id() -> UserId {
    UserId::new(USER_ID).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `Stripe-Signature` header value for `payload` signed at `timestamp`.
pub fn stripe_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

pub fn stripe_event(event_type: &str, object: serde_json::Value) -> String {
    serde_json::json!({
        "id": "evt_integration_1",
        "object": "event",
        "type": event_type,
        "created": 1_760_000_000,
        "livemode": false,
        "data": { "object": object },
    })
    .to_string()
}
