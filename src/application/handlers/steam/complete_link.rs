//! CompleteSteamLinkHandler - verifies Steam's callback and stores the id.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::account::SteamId;
use crate::domain::steam::{LinkOutcome, SteamCallback, SteamLinkError};
use crate::domain::steam::openid::APP_ORIGIN_PARAM;
use crate::ports::{OpenIdVerifier, SessionValidator, UserStore};

use super::SteamLinkSettings;

/// Command carrying Steam's callback.
#[derive(Debug, Clone, Default)]
pub struct CompleteSteamLinkCommand {
    /// Every query parameter on the callback request.
    pub params: HashMap<String, String>,
    pub referer: Option<String>,
}

/// Where to send the browser, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteSteamLinkResult {
    pub redirect_url: String,
    pub outcome: Result<SteamId, SteamLinkError>,
}

/// Handler for Steam's OpenID callback.
///
/// Never fails: every outcome becomes a redirect to the account page.
pub struct CompleteSteamLinkHandler {
    settings: SteamLinkSettings,
    openid_verifier: Arc<dyn OpenIdVerifier>,
    session_validator: Arc<dyn SessionValidator>,
    user_store: Arc<dyn UserStore>,
}

impl CompleteSteamLinkHandler {
    pub fn new(
        settings: SteamLinkSettings,
        openid_verifier: Arc<dyn OpenIdVerifier>,
        session_validator: Arc<dyn SessionValidator>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            settings,
            openid_verifier,
            session_validator,
            user_store,
        }
    }

    pub async fn handle(&self, cmd: CompleteSteamLinkCommand) -> CompleteSteamLinkResult {
        let origin = self.settings.origins.resolve(&[
            cmd.params.get(APP_ORIGIN_PARAM).map(String::as_str),
            cmd.referer.as_deref(),
        ]);

        let outcome = self.link(&cmd.params).await;

        let marker = match &outcome {
            Ok(steam_id) => {
                tracing::info!(steam_id = %steam_id, "Steam account linked");
                LinkOutcome::Linked
            }
            Err(e) => {
                tracing::warn!(code = e.marker(), error = %e, "Steam link failed");
                LinkOutcome::Failed(e.marker())
            }
        };

        CompleteSteamLinkResult {
            redirect_url: self.settings.origins.account_redirect(&origin, marker),
            outcome,
        }
    }

    async fn link(&self, params: &HashMap<String, String>) -> Result<SteamId, SteamLinkError> {
        // 1. Local checks: parameters, mode, identity, return route
        let callback = SteamCallback::parse(params)?;
        callback.check_return_to(&self.settings.callback_url)?;

        // 2. Ask Steam to confirm the assertion
        let confirmed = self
            .openid_verifier
            .check_authentication(&callback.verification_form())
            .await
            .map_err(|e| SteamLinkError::VerificationFailed(e.to_string()))?;
        if !confirmed {
            return Err(SteamLinkError::VerificationFailed(
                "assertion not confirmed by Steam".to_string(),
            ));
        }

        // 3. Resolve the user from the round-tripped token
        let user = self
            .session_validator
            .validate(&callback.token)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected on Steam callback");
                SteamLinkError::InvalidToken
            })?;

        // 4. Store the link
        self.user_store
            .set_steam_id(&user.id, &callback.steam_id)
            .await
            .map_err(|e| SteamLinkError::UpdateFailed(e.to_string()))?;

        Ok(callback.steam_id)
    }
}
