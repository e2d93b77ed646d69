//! Outbound HTTP client configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings shared by every outbound `reqwest` client (Stripe, Supabase, Steam).
#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientConfig {
    /// Total request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl HttpClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Builds a client with the configured bounds.
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .connect_timeout(self.connect_timeout())
            .user_agent(concat!("game-shlf/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > self.timeout_secs {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}
