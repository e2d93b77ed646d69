//! Authentication types for the domain layer.
//!
//! These types represent a caller whose session token has been verified.
//! They have **no external dependencies**: the Supabase adapters, the local
//! JWT verifier and the test mock all populate them via the
//! `SessionValidator` port.

use super::{ErrorKind, UserId};
use thiserror::Error;

/// Authenticated user resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// Email address, when the provider exposes one.
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: Option<String>) -> Self {
        Self { id, email }
    }
}

/// Authentication errors that can occur during token validation.
///
/// These errors are **domain-centric**: they describe what went wrong
/// from the application's perspective, not the auth provider's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Token problems are the caller's; an unreachable provider is upstream.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidToken | AuthError::TokenExpired => ErrorKind::Auth,
            AuthError::ServiceUnavailable(_) => ErrorKind::Upstream,
        }
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
