//! Account module - the user profile fields touched by linking and billing.

mod profile;
mod steam_id;

pub use profile::{EntitlementChange, UserProfile};
pub use steam_id::{SteamId, STEAM_ID_LEN};
