//! Axum router configuration for Steam linking.

use axum::{routing::get, Router};

use super::handlers::steam_auth;
use crate::adapters::http::router::AppState;

/// Create the Steam router, mounted at `/api/steam`.
///
/// # Routes
/// - `GET /auth` - Initiation and provider callback share one path, since
///   the callback URL is what Steam sends the browser back to
pub fn steam_routes() -> Router<AppState> {
    Router::new().route("/auth", get(steam_auth))
}
