//! Supabase Auth adapter for session validation.
//!
//! Asks the Supabase `/auth/v1/user` endpoint who owns a token. Tokens that
//! Supabase rejects map to `InvalidToken`; network failures and 5xx
//! responses map to `ServiceUnavailable`.
//!
//! # Example
//!
//! ```ignore
//! use game_shlf::adapters::auth::{SupabaseConfig, SupabaseSessionValidator};
//! use game_shlf::ports::SessionValidator;
//!
//! let config = SupabaseConfig::new("https://project.supabase.co", "anon-key");
//! let validator = SupabaseSessionValidator::new(config, http_client);
//! let user = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Configuration for the Supabase adapter.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://project.supabase.co")
    pub base_url: String,

    /// Anon key, sent as the `apikey` header.
    pub anon_key: SecretString,
}

impl SupabaseConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: SecretString::new(anon_key.into()),
        }
    }

    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self::new(config.supabase_base_url(), config.supabase_anon_key.clone())
    }

    fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'))
    }
}

/// The part of the Supabase user object we use.
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Validates session tokens against Supabase Auth.
pub struct SupabaseSessionValidator {
    config: SupabaseConfig,
    http_client: reqwest::Client,
}

impl SupabaseSessionValidator {
    /// `http_client` must carry the outbound timeout.
    pub fn new(config: SupabaseConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl SessionValidator for SupabaseSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let response = self
            .http_client
            .get(self.config.user_url())
            .bearer_auth(token)
            .header("apikey", self.config.anon_key.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Supabase user lookup failed");
                AuthError::service_unavailable(format!("Supabase request failed: {}", e))
            })?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::debug!(%status, "Supabase rejected session token");
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            tracing::error!(%status, "Supabase user endpoint returned error");
            return Err(AuthError::service_unavailable(format!(
                "Supabase returned {}",
                status
            )));
        }

        let user: SupabaseUser = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse Supabase user");
            AuthError::service_unavailable(format!("Failed to parse Supabase user: {}", e))
        })?;

        let user_id = UserId::new(&user.id).map_err(|_| {
            tracing::warn!("Supabase returned a user without an id");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, user.email))
    }
}

impl std::fmt::Debug for SupabaseSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseSessionValidator")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
