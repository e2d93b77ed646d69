//! Steam linking handlers.
//!
//! ## Commands
//! - Initiating a link (redirect to Steam)
//! - Completing a link from Steam's callback

mod complete_link;
mod initiate_link;

pub use complete_link::{CompleteSteamLinkCommand, CompleteSteamLinkHandler, CompleteSteamLinkResult};
pub use initiate_link::{InitiateSteamLinkCommand, InitiateSteamLinkHandler, InitiateSteamLinkResult};

use crate::config::SteamConfig;
use crate::domain::steam::AppOriginPolicy;

/// Static inputs to both phases of the link flow.
#[derive(Debug, Clone)]
pub struct SteamLinkSettings {
    pub openid_endpoint: String,
    /// Absolute callback URL, before the per-request query.
    pub callback_url: String,
    pub realm: String,
    pub origins: AppOriginPolicy,
}

impl SteamLinkSettings {
    pub fn from_config(config: &SteamConfig) -> Self {
        Self {
            openid_endpoint: config.openid_endpoint.clone(),
            callback_url: config.callback_url(),
            realm: config.realm().to_string(),
            origins: AppOriginPolicy::from_config(config),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> SteamLinkSettings {
    SteamLinkSettings {
        openid_endpoint: "https://steamcommunity.com/openid/login".to_string(),
        callback_url: "https://api.gameshlf.com/api/steam/auth".to_string(),
        realm: "https://api.gameshlf.com".to_string(),
        origins: AppOriginPolicy::new(
            vec!["gameshlf.com".to_string(), "localhost".to_string()],
            "https://gameshlf.com",
        ),
    }
}
