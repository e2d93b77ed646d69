//! InitiateSteamLinkHandler - builds the redirect that starts Steam sign-in.

use crate::domain::steam::{build_checkid_setup, build_return_to, SteamLinkError};

use super::SteamLinkSettings;

/// Command to start linking a Steam account.
#[derive(Debug, Clone, Default)]
pub struct InitiateSteamLinkCommand {
    /// Session token of the signed-in user.
    pub token: Option<String>,
    /// `app_origin` query parameter, if the app sent one.
    pub app_origin: Option<String>,
    pub referer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiateSteamLinkResult {
    /// Steam `checkid_setup` URL to redirect the browser to.
    pub redirect_url: String,
    /// The origin the callback will send the user back to.
    pub app_origin: String,
}

/// Nothing is persisted: the token and origin round-trip inside `return_to`.
pub struct InitiateSteamLinkHandler {
    settings: SteamLinkSettings,
}

impl InitiateSteamLinkHandler {
    pub fn new(settings: SteamLinkSettings) -> Self {
        Self { settings }
    }

    pub fn handle(
        &self,
        cmd: InitiateSteamLinkCommand,
    ) -> Result<InitiateSteamLinkResult, SteamLinkError> {
        let token = cmd
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SteamLinkError::MissingToken)?;

        let app_origin = self
            .settings
            .origins
            .resolve(&[cmd.app_origin.as_deref(), cmd.referer.as_deref()]);

        let return_to = build_return_to(&self.settings.callback_url, token, &app_origin)?;
        let redirect =
            build_checkid_setup(&self.settings.openid_endpoint, &return_to, &self.settings.realm)?;

        tracing::debug!(app_origin = %app_origin, "Redirecting to Steam for sign-in");

        Ok(InitiateSteamLinkResult {
            redirect_url: redirect.to_string(),
            app_origin,
        })
    }
}
