//! ReconcileWebhookHandler - applies Stripe billing events to donor status.

use std::sync::Arc;

use crate::domain::account::EntitlementChange;
use crate::domain::billing::{
    BillingEvent, Decision, DonorPolicy, ReconcileError, StripeEvent, StripeWebhookVerifier,
    WebhookError,
};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{BillingProvider, UserStore};

/// Command to reconcile one webhook delivery.
#[derive(Debug, Clone)]
pub struct ReconcileWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: Option<String>,
    pub received_at: Timestamp,
}

/// What happened to a verified event.
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// Entitlement written to the user's profile.
    Applied {
        user_id: UserId,
        change: EntitlementChange,
    },
    /// Handled event type that required no write.
    NoOp { reason: &'static str },
    /// Event type we do not act on.
    Unhandled { event_type: String },
    /// Processing failed after verification. Still acknowledged.
    Failed(ReconcileError),
}

#[derive(Debug, Clone)]
pub struct ReconcileWebhookResult {
    pub event_id: String,
    pub event_type: String,
    pub outcome: ReconcileOutcome,
}

/// Handler for Stripe webhook deliveries.
///
/// Only delivery-level problems (signature, unparseable body) are errors.
/// Anything that goes wrong after an event is trusted is reported in
/// [`ReconcileOutcome::Failed`] so the delivery is still acknowledged.
pub struct ReconcileWebhookHandler {
    verifier: Arc<StripeWebhookVerifier>,
    policy: DonorPolicy,
    billing: Arc<dyn BillingProvider>,
    user_store: Arc<dyn UserStore>,
}

impl ReconcileWebhookHandler {
    pub fn new(
        verifier: Arc<StripeWebhookVerifier>,
        policy: DonorPolicy,
        billing: Arc<dyn BillingProvider>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            verifier,
            policy,
            billing,
            user_store,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileWebhookCommand,
    ) -> Result<ReconcileWebhookResult, WebhookError> {
        // 1. Verify signature over the raw body
        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(WebhookError::MissingSignature)?;
        self.verifier
            .verify(&cmd.payload, signature, cmd.received_at.as_unix_secs())?;

        // 2. Parse and classify
        let event = StripeEvent::from_slice(&cmd.payload)?;
        let billing_event = BillingEvent::from_event(&event)?;

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Stripe webhook verified"
        );

        // 3. Decide and apply
        let outcome = match self.policy.decide(&billing_event, cmd.received_at) {
            Decision::Apply {
                customer_id,
                change,
            } => match self.apply(&customer_id, &change).await {
                Ok(user_id) => {
                    tracing::info!(
                        event_id = %event.id,
                        user_id = %user_id,
                        is_donor = change.is_grant(),
                        "Donor status updated"
                    );
                    ReconcileOutcome::Applied { user_id, change }
                }
                Err(e) => {
                    tracing::error!(
                        event_id = %event.id,
                        customer_id = %customer_id,
                        error = %e,
                        "Failed to apply billing event"
                    );
                    ReconcileOutcome::Failed(e)
                }
            },
            Decision::NoOp { reason } => {
                tracing::info!(event_id = %event.id, reason, "No donor status change");
                ReconcileOutcome::NoOp { reason }
            }
            Decision::Unhandled { event_type } => {
                tracing::debug!(event_type = %event_type, "Ignoring unhandled event type");
                ReconcileOutcome::Unhandled { event_type }
            }
        };

        Ok(ReconcileWebhookResult {
            event_id: event.id,
            event_type: event.event_type,
            outcome,
        })
    }

    async fn apply(
        &self,
        customer_id: &str,
        change: &EntitlementChange,
    ) -> Result<UserId, ReconcileError> {
        let user_id = self.resolve_user(customer_id).await?;
        self.user_store.apply_entitlement(&user_id, change).await?;
        Ok(user_id)
    }

    /// Customer to user, via the `user_id` metadata set at checkout.
    async fn resolve_user(&self, customer_id: &str) -> Result<UserId, ReconcileError> {
        let customer = self
            .billing
            .get_customer(customer_id)
            .await
            .map_err(|e| ReconcileError::Billing(e.to_string()))?
            .ok_or_else(|| ReconcileError::CustomerNotFound {
                customer_id: customer_id.to_string(),
            })?;

        customer
            .user_id
            .and_then(|raw| UserId::new(raw).ok())
            .ok_or_else(|| ReconcileError::MissingUserMetadata {
                customer_id: customer_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserStore;
    use crate::adapters::stripe::MockBillingProvider;
    use crate::domain::billing::stripe_event::StripeEventBuilder;
    use crate::domain::billing::webhook_verifier::compute_test_signature;
    use crate::domain::foundation::DomainError;
    use crate::ports::BillingError;
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";
    const NOW: i64 = 1_760_000_000;
    const USER: &str = "user-1";

    struct Fixture {
        billing: MockBillingProvider,
        store: InMemoryUserStore,
        handler: ReconcileWebhookHandler,
    }

    async fn fixture() -> Fixture {
        let billing = MockBillingProvider::new();
        billing.add_customer(MockBillingProvider::customer("cus_1", Some(USER)));
        let store = InMemoryUserStore::new();
        store.insert_user(&user_id()).await;
        let handler = ReconcileWebhookHandler::new(
            Arc::new(StripeWebhookVerifier::new(SECRET)),
            DonorPolicy::default(),
            Arc::new(billing.clone()),
            Arc::new(store.clone()),
        );
        Fixture {
            billing,
            store,
            handler,
        }
    }

    fn user_id() -> UserId {
        UserId::new(USER).unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(NOW).unwrap()
    }

    fn signed(body: &str) -> ReconcileWebhookCommand {
        ReconcileWebhookCommand {
            payload: body.as_bytes().to_vec(),
            signature: Some(compute_test_signature(SECRET, NOW, body)),
            received_at: now(),
        }
    }

    fn invoice_succeeded(customer: &str, subscription: Option<&str>) -> String {
        StripeEventBuilder::new("invoice.payment_succeeded")
            .object(json!({
                "id": "in_1",
                "object": "invoice",
                "customer": customer,
                "subscription": subscription,
            }))
            .to_json()
    }

    fn invoice_failed(attempt_count: u32) -> String {
        StripeEventBuilder::new("invoice.payment_failed")
            .object(json!({
                "id": "in_1",
                "object": "invoice",
                "customer": "cus_1",
                "subscription": "sub_1",
                "attempt_count": attempt_count,
            }))
            .to_json()
    }

    fn subscription_deleted() -> String {
        StripeEventBuilder::new("customer.subscription.deleted")
            .object(json!({ "id": "sub_1", "object": "subscription", "customer": "cus_1" }))
            .to_json()
    }

    async fn is_donor(store: &InMemoryUserStore) -> bool {
        store.get(&user_id()).await.map(|p| p.is_donor).unwrap_or(false)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Delivery rejection
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let f = fixture().await;
        let mut cmd = signed(&invoice_succeeded("cus_1", Some("sub_1")));
        cmd.signature = None;

        let result = f.handler.handle(cmd).await;

        assert!(matches!(result, Err(WebhookError::MissingSignature)));
        assert!(!f.billing.was_called("get_customer"));
    }

    #[tokio::test]
    async fn tampered_body_is_rejected_without_side_effects() {
        let f = fixture().await;
        let body = invoice_succeeded("cus_1", Some("sub_1"));
        let mut cmd = signed(&body);
        cmd.payload = body.replace("in_1", "in_2").into_bytes();

        let result = f.handler.handle(cmd).await;

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        assert!(!is_donor(&f.store).await);
    }

    #[tokio::test]
    async fn stale_signature_is_rejected() {
        let f = fixture().await;
        let mut cmd = signed(&subscription_deleted());
        cmd.received_at = Timestamp::from_unix_secs(NOW + 3_600).unwrap();

        let result = f.handler.handle(cmd).await;

        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[tokio::test]
    async fn signed_garbage_is_malformed_body() {
        let f = fixture().await;

        let result = f.handler.handle(signed("not json")).await;

        assert!(matches!(result, Err(WebhookError::MalformedBody(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Entitlement changes
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn subscription_payment_grants_donor_status() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(signed(&invoice_succeeded("cus_1", Some("sub_1"))))
            .await
            .unwrap();

        assert_eq!(result.event_type, "invoice.payment_succeeded");
        assert!(matches!(
            result.outcome,
            ReconcileOutcome::Applied { ref user_id, .. } if user_id.as_str() == USER
        ));
        let profile = f.store.get(&user_id()).await.unwrap();
        assert!(profile.is_donor);
        assert_eq!(profile.donation_started_at, Some(now()));
        assert_eq!(profile.donation_expires_at, Some(now().add_days(30)));
    }

    #[tokio::test]
    async fn one_off_payment_changes_nothing() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(signed(&invoice_succeeded("cus_1", None)))
            .await
            .unwrap();

        assert!(matches!(result.outcome, ReconcileOutcome::NoOp { .. }));
        assert!(!f.billing.was_called("get_customer"));
        assert!(!is_donor(&f.store).await);
    }

    #[tokio::test]
    async fn early_payment_failure_keeps_donor_status() {
        let f = fixture().await;
        f.handler
            .handle(signed(&invoice_succeeded("cus_1", Some("sub_1"))))
            .await
            .unwrap();

        let result = f.handler.handle(signed(&invoice_failed(3))).await.unwrap();

        assert!(matches!(result.outcome, ReconcileOutcome::NoOp { .. }));
        assert!(is_donor(&f.store).await);
    }

    #[tokio::test]
    async fn final_payment_failure_revokes() {
        let f = fixture().await;
        f.handler
            .handle(signed(&invoice_succeeded("cus_1", Some("sub_1"))))
            .await
            .unwrap();

        let result = f.handler.handle(signed(&invoice_failed(4))).await.unwrap();

        assert!(matches!(
            result.outcome,
            ReconcileOutcome::Applied {
                change: EntitlementChange::Revoke { .. },
                ..
            }
        ));
        let profile = f.store.get(&user_id()).await.unwrap();
        assert!(!profile.is_donor);
        assert_eq!(profile.donation_expires_at, Some(now()));
    }

    #[tokio::test]
    async fn subscription_deletion_revokes() {
        let f = fixture().await;

        let result = f.handler.handle(signed(&subscription_deleted())).await.unwrap();

        assert!(matches!(result.outcome, ReconcileOutcome::Applied { .. }));
        assert!(!is_donor(&f.store).await);
    }

    #[tokio::test]
    async fn redelivery_is_idempotent() {
        let f = fixture().await;
        let body = invoice_succeeded("cus_1", Some("sub_1"));

        f.handler.handle(signed(&body)).await.unwrap();
        let first = f.store.get(&user_id()).await;
        f.handler.handle(signed(&body)).await.unwrap();

        assert_eq!(f.store.get(&user_id()).await, first);
    }

    #[tokio::test]
    async fn unknown_event_type_is_acknowledged() {
        let f = fixture().await;
        let body = StripeEventBuilder::new("charge.refunded")
            .object(json!({ "id": "ch_1" }))
            .to_json();

        let result = f.handler.handle(signed(&body)).await.unwrap();

        assert!(matches!(
            result.outcome,
            ReconcileOutcome::Unhandled { ref event_type } if event_type == "charge.refunded"
        ));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Per-event failures are acknowledged
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_customer_is_reported_not_raised() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(signed(&invoice_succeeded("cus_missing", Some("sub_1"))))
            .await
            .unwrap();

        assert!(matches!(
            result.outcome,
            ReconcileOutcome::Failed(ReconcileError::CustomerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn customer_without_metadata_is_reported() {
        let f = fixture().await;
        f.billing
            .add_customer(MockBillingProvider::customer("cus_anon", None));

        let result = f
            .handler
            .handle(signed(&invoice_succeeded("cus_anon", Some("sub_1"))))
            .await
            .unwrap();

        assert!(matches!(
            result.outcome,
            ReconcileOutcome::Failed(ReconcileError::MissingUserMetadata { .. })
        ));
    }

    #[tokio::test]
    async fn stripe_outage_is_reported() {
        let f = fixture().await;
        f.billing
            .set_method_error("get_customer", BillingError::network("timeout"));

        let result = f.handler.handle(signed(&subscription_deleted())).await.unwrap();

        assert!(matches!(
            result.outcome,
            ReconcileOutcome::Failed(ReconcileError::Billing(_))
        ));
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let f = fixture().await;
        f.store
            .fail_writes_with(DomainError::database("connection reset"))
            .await;

        let result = f.handler.handle(signed(&subscription_deleted())).await.unwrap();

        assert!(matches!(
            result.outcome,
            ReconcileOutcome::Failed(ReconcileError::Store(_))
        ));
    }
}
