//! PostgreSQL implementation of InviteLinkRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use talk_core::entities::{ChatMember, InviteLink};
use talk_core::error::DomainError;
use talk_core::traits::{InviteLinkRepository, RedeemOutcome, RepoResult};
use talk_core::value_objects::ChatRole;

use crate::mappers::member_from_model;
use crate::models::{ChatMemberModel, InviteLinkModel};

use super::error::{invite_not_found, invite_not_found_by_code, map_db_error, map_redeem_error, map_unique_violation};

const LINK_COLUMNS: &str = "id, chat_id, created_by, code, expires_at, usage_limit, used_count, \
     is_active, is_suspended, suspended_by, suspended_at, suspension_reason, is_blocked, created_at";

const MEMBER_COLUMNS: &str = "id, chat_id, user_id, role, joined_at, last_read_at";

/// PostgreSQL implementation of InviteLinkRepository
#[derive(Clone)]
pub struct PgInviteLinkRepository {
    pool: PgPool,
}

impl PgInviteLinkRepository {
    /// Create a new PgInviteLinkRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteLinkRepository for PgInviteLinkRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<InviteLink>> {
        let result = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "SELECT {LINK_COLUMNS} FROM invite_links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(InviteLink::from))
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<InviteLink>> {
        let result = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "SELECT {LINK_COLUMNS} FROM invite_links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(InviteLink::from))
    }

    #[instrument(skip(self))]
    async fn find_active_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<InviteLink>> {
        let results = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "SELECT {LINK_COLUMNS} FROM invite_links \
             WHERE chat_id = $1 AND is_active AND NOT is_suspended AND NOT is_blocked \
             ORDER BY created_at DESC"
        ))
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(InviteLink::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_all_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<InviteLink>> {
        let results = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "SELECT {LINK_COLUMNS} FROM invite_links WHERE chat_id = $1 ORDER BY created_at DESC"
        ))
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(InviteLink::from).collect())
    }

    #[instrument(skip(self, link), fields(id = %link.id, chat_id = %link.chat_id))]
    async fn create(&self, link: &InviteLink) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invite_links (id, chat_id, created_by, code, expires_at, usage_limit,
                                      used_count, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(link.id)
        .bind(link.chat_id)
        .bind(link.created_by)
        .bind(&link.code)
        .bind(link.expires_at)
        .bind(link.usage_limit)
        .bind(link.used_count)
        .bind(link.is_active)
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::InviteCodeExists))?;

        Ok(())
    }

    #[instrument(skip(self, link), fields(id = %link.id))]
    async fn update(&self, link: &InviteLink) -> RepoResult<InviteLink> {
        let result = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "UPDATE invite_links \
             SET expires_at = $2, usage_limit = $3, is_active = $4 \
             WHERE id = $1 \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(link.id)
        .bind(link.expires_at)
        .bind(link.usage_limit)
        .bind(link.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| invite_not_found(link.id))?;

        Ok(InviteLink::from(result))
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("UPDATE invite_links SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(invite_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn suspend(
        &self,
        id: Uuid,
        suspended_by: Uuid,
        reason: Option<&str>,
    ) -> RepoResult<InviteLink> {
        let result = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "UPDATE invite_links \
             SET is_suspended = TRUE, suspended_by = $2, suspended_at = NOW(), suspension_reason = $3 \
             WHERE id = $1 \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(id)
        .bind(suspended_by)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| invite_not_found(id))?;

        Ok(InviteLink::from(result))
    }

    #[instrument(skip(self))]
    async fn unsuspend(&self, id: Uuid) -> RepoResult<InviteLink> {
        let result = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "UPDATE invite_links \
             SET is_suspended = FALSE, suspended_by = NULL, suspended_at = NULL, \
                 suspension_reason = NULL \
             WHERE id = $1 \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| invite_not_found(id))?;

        Ok(InviteLink::from(result))
    }

    #[instrument(skip(self))]
    async fn block(&self, id: Uuid, blocked_by: Uuid) -> RepoResult<InviteLink> {
        let result = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "UPDATE invite_links \
             SET is_blocked = TRUE, suspended_by = $2, suspended_at = NOW() \
             WHERE id = $1 \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(id)
        .bind(blocked_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| invite_not_found(id))?;

        Ok(InviteLink::from(result))
    }

    #[instrument(skip(self))]
    async fn unblock(&self, id: Uuid) -> RepoResult<InviteLink> {
        // The audit stamps stay in place while a suspension still holds them.
        let result = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "UPDATE invite_links \
             SET is_blocked = FALSE, \
                 suspended_by = CASE WHEN is_suspended THEN suspended_by END, \
                 suspended_at = CASE WHEN is_suspended THEN suspended_at END \
             WHERE id = $1 \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| invite_not_found(id))?;

        Ok(InviteLink::from(result))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM invite_links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(invite_not_found(id));
        }

        Ok(())
    }

    /// Atomic redemption: one transaction covering the validity predicate,
    /// the existing-membership check, the membership insert, and the
    /// counter increment. A row lock on the invite serializes concurrent
    /// redemptions of the same code, so `used_count` cannot overshoot its
    /// limit; the (chat_id, user_id) unique constraint backstops duplicate
    /// memberships from any other path.
    #[instrument(skip(self))]
    async fn redeem(&self, code: &str, user_id: Uuid) -> RepoResult<RedeemOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let link = sqlx::query_as::<_, InviteLinkModel>(&format!(
            "SELECT {LINK_COLUMNS} FROM invite_links WHERE code = $1 FOR UPDATE"
        ))
        .bind(code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_redeem_error)?
        .ok_or_else(|| invite_not_found_by_code(code))?;

        // Existing members short-circuit before the validity gate so a
        // re-click on an exhausted link still reports success without
        // touching the counter.
        let existing = sqlx::query_as::<_, ChatMemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM chat_members WHERE chat_id = $1 AND user_id = $2"
        ))
        .bind(link.chat_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_redeem_error)?;

        if let Some(model) = existing {
            tx.commit().await.map_err(map_redeem_error)?;
            return Ok(RedeemOutcome {
                membership: member_from_model(model)?,
                newly_joined: false,
            });
        }

        if !link.is_redeemable() {
            return Err(DomainError::InviteNotRedeemable);
        }

        let member = ChatMember::new(link.chat_id, user_id, ChatRole::Member);
        let inserted = sqlx::query_as::<_, ChatMemberModel>(&format!(
            "INSERT INTO chat_members (id, chat_id, user_id, role, joined_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (chat_id, user_id) DO NOTHING \
             RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(member.id)
        .bind(member.chat_id)
        .bind(member.user_id)
        .bind(member.role.rank())
        .bind(member.joined_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_redeem_error)?;

        let Some(inserted) = inserted else {
            // Another transaction admitted this user between our membership
            // check and the insert; the caller's retry will take the
            // idempotent path.
            return Err(DomainError::RedemptionRace);
        };

        sqlx::query("UPDATE invite_links SET used_count = used_count + 1 WHERE id = $1")
            .bind(link.id)
            .execute(&mut *tx)
            .await
            .map_err(map_redeem_error)?;

        tx.commit().await.map_err(map_redeem_error)?;

        Ok(RedeemOutcome {
            membership: member_from_model(inserted)?,
            newly_joined: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgInviteLinkRepository>();
    }
}
