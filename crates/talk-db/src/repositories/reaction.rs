//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use talk_core::entities::{Reaction, ReactionCount, ReactionType};
use talk_core::error::DomainError;
use talk_core::traits::{ReactionRepository, RepoResult};

use crate::mappers::{reaction_count_from_model, reaction_from_model};
use crate::models::{ReactionCountModel, ReactionModel};

use super::error::{map_db_error, map_unique_violation};

const REACTION_COLUMNS: &str = "id, message_id, user_id, reaction_type, created_at";

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        reaction_type: ReactionType,
    ) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(&format!(
            "SELECT {REACTION_COLUMNS} FROM reactions \
             WHERE message_id = $1 AND user_id = $2 AND reaction_type = $3"
        ))
        .bind(message_id)
        .bind(user_id)
        .bind(reaction_type.rank())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(reaction_from_model).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: Uuid) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(&format!(
            "SELECT {REACTION_COLUMNS} FROM reactions WHERE message_id = $1 ORDER BY created_at"
        ))
        .bind(message_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(reaction_from_model).collect()
    }

    #[instrument(skip(self, reaction), fields(message_id = %reaction.message_id))]
    async fn create(&self, reaction: &Reaction) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reactions (id, message_id, user_id, reaction_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(reaction.id)
        .bind(reaction.message_id)
        .bind(reaction.user_id)
        .bind(reaction.reaction_type.rank())
        .bind(reaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        reaction_type: ReactionType,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM reactions
            WHERE message_id = $1 AND user_id = $2 AND reaction_type = $3
            "#,
        )
        .bind(message_id)
        .bind(user_id)
        .bind(reaction_type.rank())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReactionNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn counts_by_message(&self, message_id: Uuid) -> RepoResult<Vec<ReactionCount>> {
        let results = sqlx::query_as::<_, ReactionCountModel>(
            r#"
            SELECT reaction_type, COUNT(*) AS count
            FROM reactions
            WHERE message_id = $1
            GROUP BY reaction_type
            ORDER BY reaction_type
            "#,
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(reaction_count_from_model).collect()
    }
}
