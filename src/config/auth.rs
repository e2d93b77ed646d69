//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (Supabase Auth)
///
/// Session tokens are Supabase access tokens. When `jwt_secret` is set they
/// are verified locally; otherwise every token is checked against the
/// Supabase `/auth/v1/user` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Supabase project URL (e.g. `https://abcd.supabase.co`)
    pub supabase_url: String,

    /// Supabase anon key, sent as the `apikey` header
    pub supabase_anon_key: String,

    /// Supabase JWT signing secret (HS256)
    pub jwt_secret: Option<String>,
}

impl AuthConfig {
    /// Base URL without a trailing slash.
    pub fn supabase_base_url(&self) -> &str {
        self.supabase_url.trim_end_matches('/')
    }

    /// True when tokens can be verified without a network round-trip.
    pub fn has_local_verification(&self) -> bool {
        self.jwt_secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the Supabase URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.supabase_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__SUPABASE_URL"));
        }
        if self.supabase_anon_key.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__SUPABASE_ANON_KEY"));
        }
        if url::Url::parse(&self.supabase_url).is_err() {
            return Err(ValidationError::InvalidUrl("AUTH__SUPABASE_URL"));
        }
        if *environment == Environment::Production && !self.supabase_url.starts_with("https://") {
            return Err(ValidationError::MustBeHttps("AUTH__SUPABASE_URL"));
        }
        Ok(())
    }
}
