//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    #[serde(default)]
    pub stripe_api_key: String,

    /// Stripe webhook signing secret
    #[serde(default)]
    pub stripe_webhook_secret: String,

    /// Stripe API base URL (overridable for stubs)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Length of the donor entitlement granted per successful invoice
    #[serde(default = "default_donation_period_days")]
    pub donation_period_days: i64,

    /// Failed invoice attempts after which the donor flag is revoked
    #[serde(default = "default_failed_payment_revoke_threshold")]
    pub failed_payment_revoke_threshold: u32,

    /// Maximum accepted age of a webhook signature timestamp; 0 disables the check
    #[serde(default = "default_webhook_tolerance_secs")]
    pub webhook_tolerance_secs: u64,

    /// Where the billing portal sends the user back to.
    /// Defaults to the account page on the default app origin.
    pub portal_return_url: Option<String>,

    /// Existing billing portal configuration (bpc_...) to open sessions
    /// with. When unset, one is created on first use and reused.
    pub portal_configuration_id: Option<String>,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired(
                "PAYMENT__STRIPE_WEBHOOK_SECRET",
            ));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") && !self.stripe_api_key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(ValidationError::InvalidUrl("PAYMENT__API_BASE_URL"));
        }
        if let Some(return_url) = &self.portal_return_url {
            if url::Url::parse(return_url).is_err() {
                return Err(ValidationError::InvalidUrl("PAYMENT__PORTAL_RETURN_URL"));
            }
        }
        if let Some(id) = &self.portal_configuration_id {
            if !id.starts_with("bpc_") {
                return Err(ValidationError::InvalidPortalConfiguration);
            }
        }
        if self.donation_period_days < 1 {
            return Err(ValidationError::InvalidDonationPeriod);
        }
        if self.failed_payment_revoke_threshold == 0 {
            return Err(ValidationError::InvalidRevokeThreshold);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            stripe_webhook_secret: String::new(),
            api_base_url: default_api_base_url(),
            donation_period_days: default_donation_period_days(),
            failed_payment_revoke_threshold: default_failed_payment_revoke_threshold(),
            webhook_tolerance_secs: default_webhook_tolerance_secs(),
            portal_return_url: None,
            portal_configuration_id: None,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_donation_period_days() -> i64 {
    30
}

fn default_failed_payment_revoke_threshold() -> u32 {
    4
}

fn default_webhook_tolerance_secs() -> u64 {
    300
}
