//! Stripe webhook event types.
//!
//! The envelope is parsed generically; only the three event types that move
//! donor entitlement are classified into [`BillingEvent`]. Everything else
//! becomes [`BillingEvent::Unhandled`] and is acknowledged without effect.

use serde::Deserialize;

use super::webhook_errors::WebhookError;

pub const INVOICE_PAYMENT_SUCCEEDED: &str = "invoice.payment_succeeded";
pub const INVOICE_PAYMENT_FAILED: &str = "invoice.payment_failed";
pub const CUSTOMER_SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

/// Stripe webhook event envelope.
///
/// Additional fields from Stripe's full event schema are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "invoice.payment_succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Parses a verified request body.
    pub fn from_slice(payload: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(payload).map_err(|e| WebhookError::MalformedBody(e.to_string()))
    }

    fn object<T: serde::de::DeserializeOwned>(&self) -> Result<T, WebhookError> {
        serde_json::from_value(self.data.object.clone()).map_err(|e| {
            WebhookError::MalformedBody(format!("{} object: {}", self.event_type, e))
        })
    }
}

/// The fields of a Stripe invoice that reconciliation needs.
#[derive(Debug, Clone, Deserialize)]
struct InvoiceObject {
    id: String,
    customer: String,
    #[serde(default)]
    subscription: Option<String>,
    /// Newer API versions move the subscription under `parent`.
    #[serde(default)]
    parent: Option<InvoiceParent>,
    #[serde(default)]
    attempt_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct InvoiceParent {
    #[serde(default)]
    subscription_details: Option<SubscriptionDetails>,
}

#[derive(Debug, Clone, Deserialize)]
struct SubscriptionDetails {
    #[serde(default)]
    subscription: Option<String>,
}

impl InvoiceObject {
    fn subscription_id(&self) -> Option<String> {
        self.subscription
            .clone()
            .or_else(|| {
                self.parent
                    .as_ref()
                    .and_then(|p| p.subscription_details.as_ref())
                    .and_then(|d| d.subscription.clone())
            })
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SubscriptionObject {
    id: String,
    customer: String,
}

/// A verified Stripe event, narrowed to what affects entitlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    InvoicePaymentSucceeded {
        invoice_id: String,
        customer_id: String,
        /// `None` for one-off payments.
        subscription_id: Option<String>,
    },
    InvoicePaymentFailed {
        invoice_id: String,
        customer_id: String,
        attempt_count: u32,
    },
    SubscriptionDeleted {
        subscription_id: String,
        customer_id: String,
    },
    Unhandled {
        event_type: String,
    },
}

impl BillingEvent {
    /// Classifies an event by its `type`.
    ///
    /// # Errors
    ///
    /// `MalformedBody` when a handled event type lacks the fields it needs.
    pub fn from_event(event: &StripeEvent) -> Result<Self, WebhookError> {
        match event.event_type.as_str() {
            INVOICE_PAYMENT_SUCCEEDED => {
                let invoice: InvoiceObject = event.object()?;
                Ok(BillingEvent::InvoicePaymentSucceeded {
                    subscription_id: invoice.subscription_id(),
                    invoice_id: invoice.id,
                    customer_id: invoice.customer,
                })
            }
            INVOICE_PAYMENT_FAILED => {
                let invoice: InvoiceObject = event.object()?;
                Ok(BillingEvent::InvoicePaymentFailed {
                    invoice_id: invoice.id,
                    customer_id: invoice.customer,
                    attempt_count: invoice.attempt_count,
                })
            }
            CUSTOMER_SUBSCRIPTION_DELETED => {
                let subscription: SubscriptionObject = event.object()?;
                Ok(BillingEvent::SubscriptionDeleted {
                    subscription_id: subscription.id,
                    customer_id: subscription.customer,
                })
            }
            other => Ok(BillingEvent::Unhandled {
                event_type: other.to_string(),
            }),
        }
    }

    /// The customer this event concerns, if it is a handled type.
    pub fn customer_id(&self) -> Option<&str> {
        match self {
            BillingEvent::InvoicePaymentSucceeded { customer_id, .. }
            | BillingEvent::InvoicePaymentFailed { customer_id, .. }
            | BillingEvent::SubscriptionDeleted { customer_id, .. } => Some(customer_id),
            BillingEvent::Unhandled { .. } => None,
        }
    }
}

/// Builder for creating test event bodies.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: event_type.into(),
            created: 1_760_000_000,
            object: serde_json::json!({}),
        }
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({
            "id": self.id,
            "object": "event",
            "type": self.event_type,
            "created": self.created,
            "livemode": false,
            "data": { "object": self.object },
        })
        .to_string()
    }

    pub fn build(&self) -> StripeEvent {
        StripeEvent::from_slice(self.to_json().as_bytes()).expect("builder emits valid events")
    }
}
