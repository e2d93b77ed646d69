//! OpenCustomerPortalHandler - creates a Stripe billing portal session.

use std::sync::Arc;

use crate::domain::billing::{PortalError, PortalFeatures};
use crate::domain::foundation::UserId;
use crate::ports::BillingProvider;

/// Command to open the portal for an authenticated user.
#[derive(Debug, Clone)]
pub struct OpenCustomerPortalCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCustomerPortalResult {
    pub url: String,
}

/// Handler for the customer portal bridge.
pub struct OpenCustomerPortalHandler {
    billing: Arc<dyn BillingProvider>,
    return_url: String,
    features: PortalFeatures,
}

impl OpenCustomerPortalHandler {
    pub fn new(
        billing: Arc<dyn BillingProvider>,
        return_url: impl Into<String>,
        features: PortalFeatures,
    ) -> Self {
        Self {
            billing,
            return_url: return_url.into(),
            features,
        }
    }

    pub async fn handle(
        &self,
        cmd: OpenCustomerPortalCommand,
    ) -> Result<OpenCustomerPortalResult, PortalError> {
        // 1. Find the customer created at checkout
        let customers = self
            .billing
            .search_customers_by_user(&cmd.user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %cmd.user_id, error = %e, "Customer search failed");
                PortalError::Upstream(e.to_string())
            })?;

        // Search results come newest first; older duplicates are ignored
        let customer = customers
            .into_iter()
            .next()
            .ok_or(PortalError::NoBillingAccount)?;

        // 2. Create the session
        let session = self
            .billing
            .create_portal_session(&customer.id, &self.return_url, &self.features)
            .await
            .map_err(|e| {
                tracing::error!(
                    customer_id = %customer.id,
                    error = %e,
                    "Portal session creation failed"
                );
                PortalError::Upstream(e.to_string())
            })?;

        tracing::info!(user_id = %cmd.user_id, customer_id = %customer.id, "Portal session created");

        Ok(OpenCustomerPortalResult { url: session.url })
    }
}
