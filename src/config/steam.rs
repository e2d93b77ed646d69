//! Steam OpenID configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Steam identity linking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SteamConfig {
    /// Steam OpenID 2.0 provider endpoint
    #[serde(default = "default_openid_endpoint")]
    pub openid_endpoint: String,

    /// Externally reachable base URL of this service; used as the OpenID realm
    pub public_base_url: String,

    /// Path of the linking route, appended to `public_base_url` for `return_to`
    #[serde(default = "default_callback_path")]
    pub callback_path: String,

    /// Host suffixes an app origin may belong to (comma-separated)
    #[serde(default = "default_allowed_origin_suffixes")]
    pub allowed_origin_suffixes: String,

    /// Origin used when no candidate passes the allow-list
    #[serde(default = "default_app_origin")]
    pub default_app_origin: String,
}

impl SteamConfig {
    /// Realm sent to Steam; the base URL without a trailing slash.
    pub fn realm(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }

    /// Absolute URL Steam redirects back to, before per-request parameters.
    pub fn callback_url(&self) -> String {
        format!("{}{}", self.realm(), self.callback_path)
    }

    pub fn allowed_suffixes(&self) -> Vec<String> {
        self.allowed_origin_suffixes
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate Steam configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.public_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("STEAM__PUBLIC_BASE_URL"));
        }
        if url::Url::parse(&self.public_base_url).is_err() {
            return Err(ValidationError::InvalidUrl("STEAM__PUBLIC_BASE_URL"));
        }
        if url::Url::parse(&self.openid_endpoint).is_err() {
            return Err(ValidationError::InvalidUrl("STEAM__OPENID_ENDPOINT"));
        }
        if url::Url::parse(&self.default_app_origin).is_err() {
            return Err(ValidationError::InvalidUrl("STEAM__DEFAULT_APP_ORIGIN"));
        }
        if !self.callback_path.starts_with('/') {
            return Err(ValidationError::InvalidCallbackPath);
        }
        if self.allowed_suffixes().is_empty() {
            return Err(ValidationError::NoAllowedOrigins);
        }
        if *environment == Environment::Production {
            if !self.public_base_url.starts_with("https://") {
                return Err(ValidationError::MustBeHttps("STEAM__PUBLIC_BASE_URL"));
            }
            if !self.default_app_origin.starts_with("https://") {
                return Err(ValidationError::MustBeHttps("STEAM__DEFAULT_APP_ORIGIN"));
            }
        }
        Ok(())
    }
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            openid_endpoint: default_openid_endpoint(),
            public_base_url: String::new(),
            callback_path: default_callback_path(),
            allowed_origin_suffixes: default_allowed_origin_suffixes(),
            default_app_origin: default_app_origin(),
        }
    }
}

fn default_openid_endpoint() -> String {
    "https://steamcommunity.com/openid/login".to_string()
}

fn default_callback_path() -> String {
    "/api/steam/auth".to_string()
}

fn default_allowed_origin_suffixes() -> String {
    "gameshlf.com,localhost".to_string()
}

fn default_app_origin() -> String {
    "https://gameshlf.com".to_string()
}
