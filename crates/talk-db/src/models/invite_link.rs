//! Invite link database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for invite_links table
#[derive(Debug, Clone, FromRow)]
pub struct InviteLinkModel {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub created_by: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub is_suspended: bool,
    pub suspended_by: Option<Uuid>,
    pub suspended_at: Option<DateTime<Utc>>,
    pub suspension_reason: Option<String>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl InviteLinkModel {
    /// Check if the row is past its expiry
    #[inline]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the row has reached its usage limit
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        if let Some(limit) = self.usage_limit {
            self.used_count >= limit
        } else {
            false
        }
    }

    /// Row-level validity gate, evaluated under the redemption row lock
    #[inline]
    pub fn is_redeemable(&self) -> bool {
        self.is_active
            && !self.is_suspended
            && !self.is_blocked
            && !self.is_expired()
            && !self.is_exhausted()
    }
}
