//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, authentication types and the error vocabulary
//! used by every flow.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ErrorKind, ValidationError};
pub use ids::UserId;
pub use timestamp::Timestamp;
