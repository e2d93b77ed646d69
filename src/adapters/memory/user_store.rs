//! In-memory UserStore.
//!
//! Useful for testing and local development without Postgres. Profiles must
//! be seeded; writes to unknown users fail like the Postgres adapter does.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{EntitlementChange, SteamId, UserProfile};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::UserStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    /// Returned from every write when set (for error testing).
    write_error: Arc<RwLock<Option<DomainError>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an empty profile for `user_id`.
    pub async fn insert_user(&self, user_id: &UserId) {
        self.insert_profile(UserProfile::new(user_id.clone())).await;
    }

    pub async fn insert_profile(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile);
    }

    /// Makes every subsequent write fail with `error`.
    pub async fn fail_writes_with(&self, error: DomainError) {
        *self.write_error.write().await = Some(error);
    }

    pub async fn get(&self, user_id: &UserId) -> Option<UserProfile> {
        self.profiles.read().await.get(user_id).cloned()
    }

    async fn update<F>(&self, user_id: &UserId, f: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut UserProfile),
    {
        if let Some(error) = self.write_error.read().await.clone() {
            return Err(error);
        }
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        f(profile);
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.get(user_id).await)
    }

    async fn set_steam_id(&self, user_id: &UserId, steam_id: &SteamId) -> Result<(), DomainError> {
        self.update(user_id, |profile| profile.link_steam(steam_id.clone()))
            .await
    }

    async fn apply_entitlement(
        &self,
        user_id: &UserId,
        change: &EntitlementChange,
    ) -> Result<(), DomainError> {
        self.update(user_id, |profile| profile.apply(change)).await
    }
}
