//! Mock OpenID verifier for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{OpenIdError, OpenIdVerifier};

/// Answers every `check_authentication` with a fixed result and records the
/// forms it was sent.
#[derive(Debug, Clone)]
pub struct MockOpenIdVerifier {
    result: Result<bool, OpenIdError>,
    forms: Arc<Mutex<Vec<Vec<(String, String)>>>>,
}

impl MockOpenIdVerifier {
    /// Confirms every assertion.
    pub fn confirming() -> Self {
        Self::with_result(Ok(true))
    }

    /// Steam answered `is_valid:false`.
    pub fn rejecting() -> Self {
        Self::with_result(Ok(false))
    }

    /// Steam could not be reached.
    pub fn unavailable() -> Self {
        Self::with_result(Err(OpenIdError::Unavailable("connection refused".into())))
    }

    fn with_result(result: Result<bool, OpenIdError>) -> Self {
        Self {
            result,
            forms: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.forms.lock().unwrap().len()
    }

    pub fn last_form(&self) -> Option<Vec<(String, String)>> {
        self.forms.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl OpenIdVerifier for MockOpenIdVerifier {
    async fn check_authentication(&self, form: &[(String, String)]) -> Result<bool, OpenIdError> {
        self.forms.lock().unwrap().push(form.to_vec());
        self.result.clone()
    }
}
