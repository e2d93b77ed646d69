//! Donor entitlement policy.
//!
//! Maps a classified billing event onto an entitlement change. Pure: the
//! customer to user resolution and the write happen in the application layer.

use super::stripe_event::BillingEvent;
use crate::domain::account::EntitlementChange;
use crate::domain::foundation::Timestamp;

pub const DEFAULT_DONATION_PERIOD_DAYS: i64 = 30;
pub const DEFAULT_REVOKE_THRESHOLD: u32 = 4;

/// What reconciliation should do with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Write `change` to the profile owned by `customer_id`.
    Apply {
        customer_id: String,
        change: EntitlementChange,
    },
    /// Handled type, but nothing to change.
    NoOp { reason: &'static str },
    /// Event type outside the reconciler's concern.
    Unhandled { event_type: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonorPolicy {
    period_days: i64,
    revoke_threshold: u32,
}

impl Default for DonorPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DONATION_PERIOD_DAYS, DEFAULT_REVOKE_THRESHOLD)
    }
}

impl DonorPolicy {
    pub fn new(period_days: i64, revoke_threshold: u32) -> Self {
        Self {
            period_days,
            revoke_threshold,
        }
    }

    pub fn period_days(&self) -> i64 {
        self.period_days
    }

    pub fn revoke_threshold(&self) -> u32 {
        self.revoke_threshold
    }

    pub fn decide(&self, event: &BillingEvent, now: Timestamp) -> Decision {
        match event {
            BillingEvent::InvoicePaymentSucceeded {
                customer_id,
                subscription_id: Some(_),
                ..
            } => Decision::Apply {
                customer_id: customer_id.clone(),
                change: EntitlementChange::grant(now, self.period_days),
            },
            BillingEvent::InvoicePaymentSucceeded {
                subscription_id: None,
                ..
            } => Decision::NoOp {
                reason: "payment not tied to a subscription",
            },
            BillingEvent::InvoicePaymentFailed {
                customer_id,
                attempt_count,
                ..
            } if *attempt_count >= self.revoke_threshold => Decision::Apply {
                customer_id: customer_id.clone(),
                change: EntitlementChange::revoke(now),
            },
            BillingEvent::InvoicePaymentFailed { .. } => Decision::NoOp {
                reason: "retries remaining",
            },
            BillingEvent::SubscriptionDeleted { customer_id, .. } => Decision::Apply {
                customer_id: customer_id.clone(),
                change: EntitlementChange::revoke(now),
            },
            BillingEvent::Unhandled { event_type } => Decision::Unhandled {
                event_type: event_type.clone(),
            },
        }
    }
}
