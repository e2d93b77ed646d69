//! Mock billing provider for testing.
//!
//! Provides a configurable mock implementation of `BillingProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured customers
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::billing::PortalFeatures;
use crate::domain::foundation::UserId;
use crate::ports::{BillingError, BillingProvider, Customer, PortalSession};

/// Mock billing provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockBillingProvider::new();
/// mock.add_customer(MockBillingProvider::customer("cus_123", Some("user-1")));
/// mock.set_method_error("get_customer", BillingError::network("timeout"));
/// ```
#[derive(Clone, Default)]
pub struct MockBillingProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Pre-configured customers by ID.
    customers: HashMap<String, Customer>,

    /// Portal session to return; a session derived from the customer id otherwise.
    next_portal: Option<PortalSession>,

    /// Specific errors by method name.
    method_errors: HashMap<String, BillingError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a customer linked to `user_id`.
    pub fn customer(id: &str, user_id: Option<&str>) -> Customer {
        Customer {
            id: id.to_string(),
            email: None,
            user_id: user_id.map(String::from),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a customer to the "database".
    pub fn add_customer(&self, customer: Customer) {
        let id = customer.id.clone();
        self.inner.lock().unwrap().customers.insert(id, customer);
    }

    pub fn set_portal_session(&self, session: PortalSession) {
        self.inner.lock().unwrap().next_portal = Some(session);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: BillingError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        self.inner.lock().unwrap().method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), BillingError> {
        match self.inner.lock().unwrap().method_errors.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, BillingError> {
        self.record_call("get_customer", vec![customer_id.to_string()]);
        self.check_error("get_customer")?;

        Ok(self.inner.lock().unwrap().customers.get(customer_id).cloned())
    }

    async fn search_customers_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Customer>, BillingError> {
        self.record_call("search_customers_by_user", vec![user_id.to_string()]);
        self.check_error("search_customers_by_user")?;

        let state = self.inner.lock().unwrap();
        let mut matches: Vec<Customer> = state
            .customers
            .values()
            .filter(|c| c.user_id.as_deref() == Some(user_id.as_str()))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
        _features: &PortalFeatures,
    ) -> Result<PortalSession, BillingError> {
        self.record_call(
            "create_portal_session",
            vec![customer_id.to_string(), return_url.to_string()],
        );
        self.check_error("create_portal_session")?;

        let next = self.inner.lock().unwrap().next_portal.clone();
        Ok(next.unwrap_or_else(|| PortalSession {
            id: format!("bps_{}", customer_id),
            url: format!("https://billing.stripe.com/p/session/{}", customer_id),
        }))
    }
}
