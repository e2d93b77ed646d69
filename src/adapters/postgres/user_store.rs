//! PostgreSQL implementation of UserStore.
//!
//! Reads and writes the Steam and donor columns of the `profiles` table.
//! The table is keyed by the Supabase auth user id (UUID).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::{EntitlementChange, SteamId, UserProfile};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::UserStore;

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a profile.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    steam_id: Option<String>,
    is_donor: bool,
    donation_started_at: Option<DateTime<Utc>>,
    donation_expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = DomainError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let steam_id = row
            .steam_id
            .as_deref()
            .map(SteamId::parse)
            .transpose()
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid steam_id: {}", e))
            })?;

        Ok(UserProfile {
            id: UserId::from(row.id),
            steam_id,
            is_donor: row.is_donor,
            donation_started_at: row.donation_started_at.map(Timestamp::from_datetime),
            donation_expires_at: row.donation_expires_at.map(Timestamp::from_datetime),
        })
    }
}

fn parse_user_id_as_uuid(user_id: &UserId) -> Result<Uuid, DomainError> {
    user_id.to_uuid().map_err(DomainError::from)
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let id = parse_user_id_as_uuid(user_id)?;

        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, steam_id, is_donor, donation_started_at, donation_expires_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load profile: {}", e)))?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn set_steam_id(&self, user_id: &UserId, steam_id: &SteamId) -> Result<(), DomainError> {
        let id = parse_user_id_as_uuid(user_id)?;

        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                steam_id = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(steam_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to link Steam account: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::user_not_found(user_id));
        }

        Ok(())
    }

    async fn apply_entitlement(
        &self,
        user_id: &UserId,
        change: &EntitlementChange,
    ) -> Result<(), DomainError> {
        let id = parse_user_id_as_uuid(user_id)?;

        let query = match *change {
            EntitlementChange::Grant {
                started_at,
                expires_at,
            } => sqlx::query(
                r#"
                UPDATE profiles SET
                    is_donor = TRUE,
                    donation_started_at = $2,
                    donation_expires_at = $3,
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(*started_at.as_datetime())
            .bind(*expires_at.as_datetime()),
            EntitlementChange::Revoke { expires_at } => sqlx::query(
                r#"
                UPDATE profiles SET
                    is_donor = FALSE,
                    donation_expires_at = $2,
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(*expires_at.as_datetime()),
        };

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to update donor status: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::user_not_found(user_id));
        }

        Ok(())
    }
}
