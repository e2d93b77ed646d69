//! User store port.
//!
//! The profile row is owned by the wider application; this service only
//! reads it and writes the Steam and donor columns. Writes are absolute
//! assignments, so replaying the same call is harmless.

use async_trait::async_trait;

use crate::domain::account::{EntitlementChange, SteamId, UserProfile};
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns `None` if no profile exists for the user.
    async fn find(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Sets the linked Steam id.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no profile row exists
    /// - `DatabaseError` on persistence failure
    async fn set_steam_id(&self, user_id: &UserId, steam_id: &SteamId) -> Result<(), DomainError>;

    /// Writes the donor fields described by `change`.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no profile row exists
    /// - `DatabaseError` on persistence failure
    async fn apply_entitlement(
        &self,
        user_id: &UserId,
        change: &EntitlementChange,
    ) -> Result<(), DomainError>;
}
