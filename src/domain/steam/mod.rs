//! Steam module - OpenID 2.0 identity linking rules.
//!
//! Pure message building and validation; the network round-trips live
//! behind the `OpenIdVerifier` port.

mod errors;
pub mod openid;
mod origin;

pub use errors::SteamLinkError;
pub use openid::{build_checkid_setup, build_return_to, is_assertion_confirmed, SteamCallback};
pub use origin::{resolve_app_origin, AppOriginPolicy, LinkOutcome};
