//! Stripe billing provider adapter.
//!
//! Implements the `BillingProvider` trait against the Stripe REST API:
//! customer lookups for webhook reconciliation, customer search and billing
//! portal sessions for the portal bridge.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripeBillingAdapter::new(config, http_client);
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::config::PaymentConfig;
use crate::domain::billing::PortalFeatures;
use crate::domain::foundation::UserId;
use crate::ports::{BillingError, BillingErrorCode, BillingProvider, Customer, PortalSession};

use super::api_types::{StripeCustomer, StripeErrorEnvelope, StripeList, StripePortalConfiguration};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Pre-provisioned portal configuration; created lazily when absent.
    portal_configuration_id: Option<String>,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            portal_configuration_id: None,
        }
    }

    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        let stripe = Self::new(config.stripe_api_key.clone())
            .with_base_url(config.api_base_url.clone());
        match &config.portal_configuration_id {
            Some(id) => stripe.with_portal_configuration(id.clone()),
            None => stripe,
        }
    }

    pub fn with_portal_configuration(mut self, id: impl Into<String>) -> Self {
        self.portal_configuration_id = Some(id.into());
        self
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_base_url", &self.api_base_url)
            .field("portal_configuration_id", &self.portal_configuration_id)
            .finish_non_exhaustive()
    }
}

/// Stripe billing provider adapter.
pub struct StripeBillingAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
    /// Portal configuration id, resolved once per process.
    portal_configuration: OnceCell<String>,
}

impl StripeBillingAdapter {
    /// `http_client` must carry the outbound timeout.
    pub fn new(config: StripeConfig, http_client: reqwest::Client) -> Self {
        let portal_configuration = match &config.portal_configuration_id {
            Some(id) => OnceCell::new_with(Some(id.clone())),
            None => OnceCell::new(),
        };
        Self {
            config,
            http_client,
            portal_configuration,
        }
    }

    /// Configuration id shared by every portal session.
    ///
    /// Concurrent first calls wait on a single creation; a failed creation
    /// leaves the cell empty so the next call retries.
    async fn portal_configuration_id(
        &self,
        features: &PortalFeatures,
    ) -> Result<&str, BillingError> {
        self.portal_configuration
            .get_or_try_init(|| self.create_portal_configuration(features))
            .await
            .map(String::as_str)
    }

    async fn create_portal_configuration(
        &self,
        features: &PortalFeatures,
    ) -> Result<String, BillingError> {
        let response = self
            .http_client
            .post(self.config.url("/v1/billing_portal/configurations"))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&portal_configuration_params(features))
            .send()
            .await
            .map_err(network_error)?;

        let configuration: StripePortalConfiguration =
            parse_response(response, "create_portal_configuration").await?;
        tracing::info!(configuration_id = %configuration.id, "Created billing portal configuration");
        Ok(configuration.id)
    }
}

/// Form parameters for `POST /v1/billing_portal/configurations`.
fn portal_configuration_params(features: &PortalFeatures) -> Vec<(String, String)> {
    let mut params = vec![
        (
            "features[payment_method_update][enabled]".to_string(),
            features.payment_method_update.to_string(),
        ),
        (
            "features[invoice_history][enabled]".to_string(),
            features.invoice_history.to_string(),
        ),
        (
            "features[customer_update][enabled]".to_string(),
            (!features.customer_update_fields.is_empty()).to_string(),
        ),
    ];
    params.extend(
        features
            .customer_update_fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                (
                    format!("features[customer_update][allowed_updates][{}]", i),
                    field.to_string(),
                )
            }),
    );
    params
}

/// Live customers ordered by creation time, newest first.
fn newest_first(mut customers: Vec<StripeCustomer>) -> Vec<Customer> {
    customers.retain(|c| !c.deleted);
    customers.sort_by(|a, b| b.created.cmp(&a.created));
    customers.into_iter().map(Customer::from).collect()
}

/// Stripe search query matching customers by our user id.
fn customer_search_query(user_id: &UserId) -> String {
    let escaped = user_id.as_str().replace('\\', "\\\\").replace('\'', "\\'");
    format!("metadata['user_id']:'{}'", escaped)
}

fn network_error(e: reqwest::Error) -> BillingError {
    if e.is_timeout() {
        BillingError::network(format!("Stripe request timed out: {}", e))
    } else {
        BillingError::network(e.to_string())
    }
}

fn error_for_status(status: StatusCode, body: &str) -> BillingError {
    let envelope: Option<StripeErrorEnvelope> = serde_json::from_str(body).ok();
    let message = envelope
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| format!("Stripe API returned {}", status));
    let provider_code = envelope.and_then(|e| e.error.code);

    let code = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BillingErrorCode::AuthenticationError,
        StatusCode::NOT_FOUND => BillingErrorCode::NotFound,
        StatusCode::TOO_MANY_REQUESTS => BillingErrorCode::RateLimitExceeded,
        _ => BillingErrorCode::ProviderError,
    };

    let error = BillingError::new(code, format!("Stripe API error: {}", message));
    match provider_code {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<T, BillingError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        let error = error_for_status(status, &error_text);
        tracing::error!(operation, %status, error = %error, "Stripe request failed");
        return Err(error);
    }

    response.json().await.map_err(|e| {
        BillingError::provider(format!("Failed to parse Stripe response: {}", e))
    })
}

#[async_trait]
impl BillingProvider for StripeBillingAdapter {
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, BillingError> {
        let response = self
            .http_client
            .get(self.config.url(&format!("/v1/customers/{}", customer_id)))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(network_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let stripe_customer: StripeCustomer = parse_response(response, "get_customer").await?;

        if stripe_customer.deleted {
            return Ok(None);
        }

        Ok(Some(stripe_customer.into()))
    }

    async fn search_customers_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Customer>, BillingError> {
        let response = self
            .http_client
            .get(self.config.url("/v1/customers/search"))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .query(&[("query", customer_search_query(user_id))])
            .send()
            .await
            .map_err(network_error)?;

        let list: StripeList<StripeCustomer> =
            parse_response(response, "search_customers").await?;

        Ok(newest_first(list.data))
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
        features: &PortalFeatures,
    ) -> Result<PortalSession, BillingError> {
        let configuration_id = self.portal_configuration_id(features).await?;

        let response = self
            .http_client
            .post(self.config.url("/v1/billing_portal/sessions"))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&[
                ("customer", customer_id),
                ("return_url", return_url),
                ("configuration", configuration_id),
            ])
            .send()
            .await
            .map_err(network_error)?;

        #[derive(Deserialize)]
        struct PortalSessionResponse {
            id: String,
            url: String,
        }

        let portal: PortalSessionResponse =
            parse_response(response, "create_portal_session").await?;

        Ok(PortalSession {
            id: portal.id,
            url: portal.url,
        })
    }
}
