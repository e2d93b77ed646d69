//! Steam `check_authentication` adapter.
//!
//! Posts the echoed assertion back to the Steam OpenID endpoint and checks
//! the key-value response for `is_valid:true`.

use async_trait::async_trait;

use crate::domain::steam::is_assertion_confirmed;
use crate::ports::{OpenIdError, OpenIdVerifier};

pub struct SteamOpenIdVerifier {
    endpoint: String,
    http_client: reqwest::Client,
}

impl SteamOpenIdVerifier {
    /// `http_client` must carry the outbound timeout.
    pub fn new(endpoint: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client,
        }
    }
}

#[async_trait]
impl OpenIdVerifier for SteamOpenIdVerifier {
    async fn check_authentication(&self, form: &[(String, String)]) -> Result<bool, OpenIdError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, timeout = e.is_timeout(), "Steam check_authentication request failed");
                OpenIdError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "Steam check_authentication returned error status");
            return Err(OpenIdError::Unavailable(format!("Steam returned {}", status)));
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read Steam check_authentication response");
            OpenIdError::Unavailable(e.to_string())
        })?;

        let confirmed = is_assertion_confirmed(&body);
        if !confirmed {
            tracing::warn!("Steam did not confirm the OpenID assertion");
        }
        Ok(confirmed)
    }
}

impl std::fmt::Debug for SteamOpenIdVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamOpenIdVerifier")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
