//! InviteLink entity - a shareable join code for a chat
//!
//! Validity is the conjunction of four independent axes: the manual
//! `is_active` flag (terminal once cleared), the reversible suspension hold,
//! the owner-only block hold, and the derived time/usage state. A link is
//! redeemable only when all four allow it.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Invite link entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteLink {
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

impl InviteLink {
    /// Default lifetime when the caller does not specify an expiry
    pub const DEFAULT_TTL_DAYS: i64 = 7;

    /// Create a new InviteLink expiring after the default lifetime
    pub fn new(chat_id: Uuid, created_by: Uuid, code: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            chat_id,
            created_by,
            code,
            expires_at: now + Duration::days(Self::DEFAULT_TTL_DAYS),
            usage_limit: None,
            used_count: 0,
            is_active: true,
            is_suspended: false,
            suspended_by: None,
            suspended_at: None,
            suspension_reason: None,
            is_blocked: false,
            created_at: now,
        }
    }

    /// Set an explicit expiry timestamp
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Cap the number of redemptions
    pub fn with_usage_limit(mut self, limit: i32) -> Self {
        if limit > 0 {
            self.usage_limit = Some(limit);
        }
        self
    }

    /// Check if the link has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the link has reached its usage limit
    pub fn is_exhausted(&self) -> bool {
        if let Some(limit) = self.usage_limit {
            self.used_count >= limit
        } else {
            false
        }
    }

    /// Effective validity gate across all four axes
    ///
    /// Must hold at the moment of redemption; the store re-evaluates it
    /// inside the redemption transaction.
    pub fn is_redeemable(&self) -> bool {
        self.is_active
            && !self.is_suspended
            && !self.is_blocked
            && !self.is_expired()
            && !self.is_exhausted()
    }

    /// Remaining redemptions (None if unlimited)
    pub fn remaining_uses(&self) -> Option<i32> {
        self.usage_limit.map(|limit| limit - self.used_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_link() -> InviteLink {
        InviteLink::new(Uuid::new_v4(), Uuid::new_v4(), "abcd2345".to_string())
    }

    #[test]
    fn test_new_link_is_redeemable() {
        let link = fresh_link();
        assert!(link.is_active);
        assert!(!link.is_expired());
        assert!(!link.is_exhausted());
        assert!(link.is_redeemable());
        assert_eq!(link.used_count, 0);
        assert_eq!(link.remaining_uses(), None);
    }

    #[test]
    fn test_default_expiry_is_seven_days() {
        let link = fresh_link();
        let ttl = link.expires_at - link.created_at;
        assert_eq!(ttl, Duration::days(InviteLink::DEFAULT_TTL_DAYS));
    }

    #[test]
    fn test_usage_limit_exhaustion() {
        let mut link = fresh_link().with_usage_limit(2);
        assert_eq!(link.remaining_uses(), Some(2));

        link.used_count = 1;
        assert!(link.is_redeemable());

        link.used_count = 2;
        assert!(link.is_exhausted());
        assert!(!link.is_redeemable());
        assert_eq!(link.remaining_uses(), Some(0));
    }

    #[test]
    fn test_non_positive_limit_means_unlimited() {
        let link = fresh_link().with_usage_limit(0);
        assert_eq!(link.usage_limit, None);
    }

    #[test]
    fn test_expired_link_is_not_redeemable() {
        let link = fresh_link().with_expiry(Utc::now() - Duration::hours(1));
        assert!(link.is_expired());
        assert!(!link.is_redeemable());
    }

    #[test]
    fn test_each_hold_axis_gates_redemption() {
        let mut link = fresh_link();
        link.is_suspended = true;
        assert!(!link.is_redeemable());

        let mut link = fresh_link();
        link.is_blocked = true;
        assert!(!link.is_redeemable());

        let mut link = fresh_link();
        link.is_active = false;
        assert!(!link.is_redeemable());
    }
}
