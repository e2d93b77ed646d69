//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware and extractor

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
