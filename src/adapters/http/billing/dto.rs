//! HTTP DTOs for billing endpoints.

use serde::Serialize;

/// Acknowledgement returned for every verified webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Response carrying the hosted portal URL.
#[derive(Debug, Clone, Serialize)]
pub struct PortalResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_serializes_received_true() {
        let json = serde_json::to_string(&WebhookAck::received()).unwrap();
        assert_eq!(json, r#"{"received":true}"#);
    }

    #[test]
    fn portal_response_serializes_url() {
        let response = PortalResponse {
            url: "https://billing.stripe.com/p/session/abc".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["url"], "https://billing.stripe.com/p/session/abc");
    }
}
