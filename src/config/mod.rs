//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `GAME_SHLF` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use game_shlf::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod error;
mod http_client;
mod payment;
mod server;
mod steam;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use http_client::HttpClientConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use steam::SteamConfig;

use serde::Deserialize;

/// Path of the account page every Steam linking outcome lands on.
pub const ACCOUNT_PAGE_PATH: &str = "/account";

/// Root application configuration
///
/// Built once at startup by [`AppConfig::load()`] and handed to the adapters
/// and handlers that need each section.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Profile store connection; absent means in-memory (non-production only)
    pub database: Option<DatabaseConfig>,

    /// Session token verification (Supabase)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Steam OpenID linking
    pub steam: SteamConfig,

    /// Outbound HTTP client bounds
    #[serde(default)]
    pub http_client: HttpClientConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GAME_SHLF` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GAME_SHLF__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GAME_SHLF__PAYMENT__STRIPE_API_KEY=...` -> `payment.stripe_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required sections are missing or values cannot
    /// be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GAME_SHLF")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        match &self.database {
            Some(database) => database.validate()?,
            None if self.is_production() => {
                return Err(ValidationError::MissingRequired("DATABASE__URL"))
            }
            None => {}
        }
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        self.steam.validate(&self.server.environment)?;
        self.http_client.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Return URL handed to the billing portal.
    pub fn portal_return_url(&self) -> String {
        self.payment.portal_return_url.clone().unwrap_or_else(|| {
            format!(
                "{}{}",
                self.steam.default_app_origin.trim_end_matches('/'),
                ACCOUNT_PAGE_PATH
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "GAME_SHLF__AUTH__SUPABASE_URL",
        "GAME_SHLF__AUTH__SUPABASE_ANON_KEY",
        "GAME_SHLF__PAYMENT__STRIPE_API_KEY",
        "GAME_SHLF__PAYMENT__STRIPE_WEBHOOK_SECRET",
        "GAME_SHLF__PAYMENT__FAILED_PAYMENT_REVOKE_THRESHOLD",
        "GAME_SHLF__STEAM__PUBLIC_BASE_URL",
        "GAME_SHLF__DATABASE__URL",
        "GAME_SHLF__SERVER__PORT",
        "GAME_SHLF__SERVER__ENVIRONMENT",
    ];

    fn set_minimal_env() {
        env::set_var("GAME_SHLF__AUTH__SUPABASE_URL", "https://project.supabase.co");
        env::set_var("GAME_SHLF__AUTH__SUPABASE_ANON_KEY", "anon-key");
        env::set_var("GAME_SHLF__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        env::set_var("GAME_SHLF__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
        env::set_var("GAME_SHLF__STEAM__PUBLIC_BASE_URL", "https://api.gameshlf.com");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.auth.supabase_url, "https://project.supabase.co");
        assert_eq!(config.steam.public_base_url, "https://api.gameshlf.com");
        assert!(config.database.is_none());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.payment.donation_period_days, 30);
        assert_eq!(config.payment.failed_payment_revoke_threshold, 4);
        assert_eq!(config.http_client.timeout_secs, 10);
    }

    #[test]
    fn test_threshold_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GAME_SHLF__PAYMENT__FAILED_PAYMENT_REVOKE_THRESHOLD", "3");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().payment.failed_payment_revoke_threshold, 3);
    }

    #[test]
    fn test_production_requires_database() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GAME_SHLF__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("DATABASE__URL"))
        );
    }

    #[test]
    fn test_database_section_loaded_when_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GAME_SHLF__DATABASE__URL", "postgresql://test@localhost/test");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let database = config.database.expect("database section");
        assert_eq!(database.url, "postgresql://test@localhost/test");
    }

    #[test]
    fn test_portal_return_url_defaults_to_account_page() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.portal_return_url(), "https://gameshlf.com/account");
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GAME_SHLF__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }
}
