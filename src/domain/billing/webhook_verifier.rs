//! Stripe webhook signature verification.
//!
//! Implements verification of the `Stripe-Signature` header using
//! HMAC-SHA256 over `"{t}.{body}"`, with constant-time comparison and an
//! optional replay window. `now` is always passed in, so verification is a
//! pure function of `(secret, header, body, now)`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed clock skew for future timestamps (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signatures (HMAC-SHA256). Several during secret rotation.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>][,v0=<legacy>]`
    ///
    /// Unknown keys (including legacy `v0`) are ignored.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part.trim().split_once('=').ok_or_else(|| {
                WebhookError::MalformedSignature("invalid header format".to_string())
            })?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::MalformedSignature("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::MalformedSignature("invalid v1 signature hex".to_string())
                    })?);
                }
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| WebhookError::MalformedSignature("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::MalformedSignature(
                "missing v1 signature".to_string(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    secret: SecretString,
    /// Maximum signature age in seconds; `None` disables the replay window.
    tolerance_secs: Option<i64>,
}

impl StripeWebhookVerifier {
    /// Creates a verifier with the given signing secret and the default
    /// five minute replay window.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            tolerance_secs: Some(300),
        }
    }

    /// Sets the replay window; `0` disables it.
    pub fn with_tolerance_secs(mut self, secs: u64) -> Self {
        self.tolerance_secs = match secs {
            0 => None,
            secs => Some(i64::try_from(secs).unwrap_or(i64::MAX)),
        };
        self
    }

    /// Verifies `payload` against the raw header value.
    ///
    /// # Errors
    ///
    /// - `Configuration` - no signing secret configured
    /// - `MalformedSignature` - header cannot be parsed
    /// - `TimestampOutOfRange` - outside the replay window
    /// - `InvalidSignature` - no `v1` entry matches
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<(), WebhookError> {
        if self.secret.expose_secret().is_empty() {
            return Err(WebhookError::Configuration(
                "webhook signing secret is empty".to_string(),
            ));
        }

        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp, now)?;

        let expected = self.compute_signature(header.timestamp, payload)?;

        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let Some(tolerance) = self.tolerance_secs else {
            return Ok(());
        };
        let age = now.saturating_sub(timestamp);

        if age > tolerance || age < -MAX_CLOCK_SKEW_SECS {
            tracing::warn!(
                signature_timestamp = timestamp,
                now,
                age_secs = age,
                "Webhook signature outside replay window"
            );
            return Err(WebhookError::TimestampOutOfRange);
        }

        Ok(())
    }

    /// HMAC-SHA256 over the raw bytes of `"{timestamp}.{payload}"`.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| WebhookError::Configuration(e.to_string()))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a valid `Stripe-Signature` header for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
