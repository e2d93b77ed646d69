//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `supabase` - Asks Supabase Auth who owns the token
//! - `jwt` - Verifies Supabase tokens locally with the project JWT secret
//! - `mock` - Test implementation that doesn't require external services

mod jwt;
mod mock;
mod supabase;

use std::sync::Arc;

pub use jwt::{JwtSessionValidator, SUPABASE_AUDIENCE};
pub use mock::MockSessionValidator;
pub use supabase::{SupabaseConfig, SupabaseSessionValidator};

use crate::config::AuthConfig;
use crate::ports::SessionValidator;

/// Picks local verification when a JWT secret is configured, otherwise the
/// Supabase user endpoint.
pub fn session_validator_from_config(
    config: &AuthConfig,
    http_client: reqwest::Client,
) -> Arc<dyn SessionValidator> {
    match config.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
        Some(secret) => {
            tracing::info!("Verifying session tokens locally");
            Arc::new(JwtSessionValidator::new(secret))
        }
        None => {
            tracing::info!(supabase_url = %config.supabase_base_url(), "Verifying session tokens with Supabase");
            Arc::new(SupabaseSessionValidator::new(
                SupabaseConfig::from_auth_config(config),
                http_client,
            ))
        }
    }
}
