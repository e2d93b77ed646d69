//! HTTP handler for the Steam linking endpoint.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::header::{LOCATION, REFERER};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::router::AppState;
use crate::application::handlers::steam::{CompleteSteamLinkCommand, InitiateSteamLinkCommand};
use crate::domain::steam::openid::{APP_ORIGIN_PARAM, MODE_PARAM, TOKEN_PARAM};

/// GET /api/steam/auth - Start a link, or complete one from Steam's callback.
///
/// A request carrying `openid.mode` is Steam's callback and always answers
/// with a redirect to the account page. Anything else starts the flow.
pub async fn steam_auth(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let referer = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if params.contains_key(MODE_PARAM) {
        let result = state
            .complete_steam_link_handler()
            .handle(CompleteSteamLinkCommand { params, referer })
            .await;
        return Ok(found(&result.redirect_url));
    }

    let cmd = InitiateSteamLinkCommand {
        token: params.get(TOKEN_PARAM).cloned(),
        app_origin: params.get(APP_ORIGIN_PARAM).cloned(),
        referer,
    };
    let result = state.initiate_steam_link_handler().handle(cmd)?;

    Ok(found(&result.redirect_url))
}

/// 302 Found. axum's `Redirect` only offers 303/307/308.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
