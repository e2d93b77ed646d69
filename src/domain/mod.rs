//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, errors)
//! - `account` - Profile fields written by the Steam and billing flows
//! - `steam` - OpenID 2.0 identity linking rules
//! - `billing` - Webhook verification, event classification, donor policy

pub mod account;
pub mod billing;
pub mod foundation;
pub mod steam;
