//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionValidator` - Session token to user identity
//! - `UserStore` - Steam and donor columns of the profile row
//! - `BillingProvider` - Stripe customer lookups and portal sessions
//! - `OpenIdVerifier` - Steam `check_authentication` round-trip

mod billing_provider;
mod openid_verifier;
mod session_validator;
mod user_store;

pub use billing_provider::{BillingError, BillingErrorCode, BillingProvider, Customer, PortalSession};
pub use openid_verifier::{OpenIdError, OpenIdVerifier};
pub use session_validator::SessionValidator;
pub use user_store::UserStore;
