//! User profile fields owned by the account flows.

use serde::Serialize;

use super::SteamId;
use crate::domain::foundation::{Timestamp, UserId};

/// The slice of a user row that this service reads and writes.
///
/// `steam_id` belongs to the Steam linker; the donor fields belong to the
/// billing reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub steam_id: Option<SteamId>,
    pub is_donor: bool,
    pub donation_started_at: Option<Timestamp>,
    pub donation_expires_at: Option<Timestamp>,
}

impl UserProfile {
    /// A fresh profile with nothing linked and no entitlement.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            steam_id: None,
            is_donor: false,
            donation_started_at: None,
            donation_expires_at: None,
        }
    }

    pub fn link_steam(&mut self, steam_id: SteamId) {
        self.steam_id = Some(steam_id);
    }

    /// Applies a donor entitlement change.
    pub fn apply(&mut self, change: &EntitlementChange) {
        match *change {
            EntitlementChange::Grant {
                started_at,
                expires_at,
            } => {
                self.is_donor = true;
                self.donation_started_at = Some(started_at);
                self.donation_expires_at = Some(expires_at);
            }
            EntitlementChange::Revoke { expires_at } => {
                self.is_donor = false;
                self.donation_expires_at = Some(expires_at);
            }
        }
    }
}

/// A write to the donor fields of a profile.
///
/// Both variants are absolute assignments, so re-applying the same change
/// leaves the profile unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementChange {
    /// `is_donor = true` for `[started_at, expires_at]`.
    Grant {
        started_at: Timestamp,
        expires_at: Timestamp,
    },
    /// `is_donor = false`, expiry pinned to the revocation time.
    Revoke { expires_at: Timestamp },
}

impl EntitlementChange {
    /// Grants a donation window of `period_days` starting at `now`.
    pub fn grant(now: Timestamp, period_days: i64) -> Self {
        EntitlementChange::Grant {
            started_at: now,
            expires_at: now.add_days(period_days),
        }
    }

    pub fn revoke(now: Timestamp) -> Self {
        EntitlementChange::Revoke { expires_at: now }
    }

    pub fn is_grant(&self) -> bool {
        matches!(self, EntitlementChange::Grant { .. })
    }
}
