//! Steam OpenID adapters.
//!
//! - `SteamOpenIdVerifier` - `check_authentication` over HTTPS
//! - `MockOpenIdVerifier` - fixed answers for tests

mod mock;
mod openid_verifier;

pub use mock::MockOpenIdVerifier;
pub use openid_verifier::SteamOpenIdVerifier;
