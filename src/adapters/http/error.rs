//! HTTP error mapping.
//!
//! Every flow error is converted to the JSON body below. The status comes
//! from the error's [`ErrorKind`], never from the individual variant.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::billing::{PortalError, WebhookError};
use crate::domain::foundation::{AuthError, ErrorKind};
use crate::domain::steam::SteamLinkError;

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// API error type that converts flow errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Steam(SteamLinkError),
    Webhook(WebhookError),
    Portal(PortalError),
    Auth(AuthError),
}

impl From<SteamLinkError> for ApiError {
    fn from(err: SteamLinkError) -> Self {
        Self::Steam(err)
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        Self::Portal(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Steam(e) => e.kind(),
            ApiError::Webhook(e) => e.kind(),
            ApiError::Portal(e) => e.kind(),
            ApiError::Auth(e) => e.kind(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Steam(e) => e.code(),
            ApiError::Webhook(e) => e.code(),
            ApiError::Portal(e) => e.code(),
            ApiError::Auth(AuthError::TokenExpired) => "TOKEN_EXPIRED",
            ApiError::Auth(AuthError::ServiceUnavailable(_)) => "UPSTREAM_ERROR",
            ApiError::Auth(_) => "UNAUTHORIZED",
        }
    }

    fn message(&self) -> String {
        match self.kind() {
            // Upstream and configuration detail stays in the logs
            ErrorKind::Upstream => "Upstream service request failed".to_string(),
            ErrorKind::Config => "Server misconfigured".to_string(),
            _ => match self {
                ApiError::Steam(e) => e.to_string(),
                ApiError::Webhook(e) => e.to_string(),
                ApiError::Portal(e) => e.to_string(),
                ApiError::Auth(AuthError::TokenExpired) => "Token expired".to_string(),
                ApiError::Auth(_) => "Invalid or missing session token".to_string(),
            },
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Steam(e) => e.to_string(),
            ApiError::Webhook(e) => e.to_string(),
            ApiError::Portal(e) => e.to_string(),
            ApiError::Auth(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind().status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self.detail(), "Request failed");
        }

        let body = ErrorResponse::new(self.code(), self.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::NO_BILLING_ACCOUNT_MESSAGE;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn error_response_has_two_fields() {
        let response = ErrorResponse::new("NOT_FOUND", "Not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error_code": "NOT_FOUND", "message": "Not found"})
        );
    }

    #[tokio::test]
    async fn missing_token_is_400_with_code() {
        let response = ApiError::from(SteamLinkError::MissingToken).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "MISSING_TOKEN");
        assert_eq!(body["message"], "Missing session token");
    }

    #[tokio::test]
    async fn no_billing_account_is_404_with_user_message() {
        let response = ApiError::from(PortalError::NoBillingAccount).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "NO_BILLING_ACCOUNT");
        assert_eq!(body["message"], NO_BILLING_ACCOUNT_MESSAGE);
    }

    #[tokio::test]
    async fn upstream_detail_is_not_exposed() {
        let response =
            ApiError::from(PortalError::Upstream("sk_live_secret rejected".into())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "UPSTREAM_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("sk_live"));
    }

    #[test]
    fn signature_errors_are_400() {
        let response = ApiError::from(WebhookError::InvalidSignature).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_secret_is_500() {
        let response =
            ApiError::from(WebhookError::Configuration("empty".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn token_errors_are_401() {
        for err in [AuthError::InvalidToken, AuthError::TokenExpired] {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn auth_outage_is_500_upstream() {
        let response =
            ApiError::from(AuthError::service_unavailable("supabase 503")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "UPSTREAM_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("supabase"));
    }

    #[test]
    fn every_json_code_is_upper_case() {
        let errors = [
            ApiError::from(SteamLinkError::MissingToken),
            ApiError::from(SteamLinkError::InvalidToken),
            ApiError::from(WebhookError::InvalidSignature),
            ApiError::from(PortalError::NoBillingAccount),
            ApiError::from(AuthError::InvalidToken),
        ];
        for err in errors {
            let code = err.code();
            assert_eq!(code, code.to_ascii_uppercase());
        }
    }
}
