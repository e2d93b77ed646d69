//! Stripe API objects as returned by the REST endpoints we call.
//!
//! Only fields relevant to our processing are captured; everything else in
//! Stripe's payloads is ignored.

use std::collections::HashMap;

use serde::Deserialize;

use crate::ports::Customer;

/// Metadata key linking a Stripe customer to our user.
pub const USER_ID_METADATA_KEY: &str = "user_id";

/// Stripe Customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    /// Unique customer identifier (cus_...).
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Custom metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Creation time, Unix seconds.
    #[serde(default)]
    pub created: i64,

    /// Whether the customer has been deleted.
    #[serde(default)]
    pub deleted: bool,
}

impl StripeCustomer {
    /// Our user id from metadata, if present and non-blank.
    pub fn user_id(&self) -> Option<String> {
        self.metadata
            .get(USER_ID_METADATA_KEY)
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(String::from)
    }
}

impl From<StripeCustomer> for Customer {
    fn from(customer: StripeCustomer) -> Self {
        Customer {
            user_id: customer.user_id(),
            id: customer.id,
            email: customer.email,
        }
    }
}

/// List envelope used by list and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// Billing portal configuration (bpc_...).
#[derive(Debug, Clone, Deserialize)]
pub struct StripePortalConfiguration {
    pub id: String,
}

/// Error body Stripe returns with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
