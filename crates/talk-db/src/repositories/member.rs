//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use talk_core::entities::ChatMember;
use talk_core::error::DomainError;
use talk_core::traits::{MemberRepository, RepoResult};
use talk_core::value_objects::ChatRole;

use crate::mappers::member_from_model;
use crate::models::ChatMemberModel;

use super::error::{map_db_error, map_unique_violation, member_not_found};

const MEMBER_COLUMNS: &str = "id, chat_id, user_id, role, joined_at, last_read_at";

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<Option<ChatMember>> {
        let result = sqlx::query_as::<_, ChatMemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM chat_members WHERE chat_id = $1 AND user_id = $2"
        ))
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(member_from_model).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<ChatMember>> {
        let results = sqlx::query_as::<_, ChatMemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM chat_members WHERE chat_id = $1 ORDER BY joined_at"
        ))
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(member_from_model).collect()
    }

    #[instrument(skip(self))]
    async fn is_member(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM chat_members WHERE chat_id = $1 AND user_id = $2)
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn role_of(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<Option<ChatRole>> {
        let rank = sqlx::query_scalar::<_, i16>(
            r#"
            SELECT role FROM chat_members WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        rank.map(|r| ChatRole::try_from(r).map_err(|e| DomainError::InternalError(e.to_string())))
            .transpose()
    }

    #[instrument(skip(self))]
    async fn count_by_chat(&self, chat_id: Uuid) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM chat_members WHERE chat_id = $1
            "#,
        )
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self, member), fields(chat_id = %member.chat_id, user_id = %member.user_id))]
    async fn create(&self, member: &ChatMember) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_members (id, chat_id, user_id, role, joined_at, last_read_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(member.id)
        .bind(member.chat_id)
        .bind(member.user_id)
        .bind(member.role.rank())
        .bind(member.joined_at)
        .bind(member.last_read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyMember))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_role(&self, chat_id: Uuid, user_id: Uuid, role: ChatRole) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE chat_members SET role = $3 WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .bind(role.rank())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(member_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_last_read(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE chat_members SET last_read_at = NOW() WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(member_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM chat_members WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(member_not_found());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMemberRepository>();
    }
}
