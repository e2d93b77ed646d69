//! OpenID assertion verification port.
//!
//! Confirms a positive assertion with the provider (`check_authentication`).
//! The form is built by the domain; the adapter only transports it.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenIdError {
    /// Request failed, timed out, or the provider answered non-2xx.
    #[error("OpenID provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait OpenIdVerifier: Send + Sync {
    /// Returns `Ok(true)` only when the provider confirms the assertion.
    async fn check_authentication(&self, form: &[(String, String)]) -> Result<bool, OpenIdError>;
}
