//! PostgreSQL implementation of ChatRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use talk_core::entities::Chat;
use talk_core::traits::{ChatRepository, RepoResult};

use crate::mappers::chat_from_model;
use crate::models::ChatModel;

use super::error::{chat_not_found, map_db_error};

const CHAT_COLUMNS: &str = "id, name, description, avatar_url, chat_type, created_by, \
     created_at, last_activity_at, allow_invites, allow_members_to_invite, max_members";

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// Create a new PgChatRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Chat>> {
        let result = sqlx::query_as::<_, ChatModel>(&format!(
            "SELECT {CHAT_COLUMNS} FROM chats WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(chat_from_model).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Chat>> {
        let results = sqlx::query_as::<_, ChatModel>(&format!(
            "SELECT {CHAT_COLUMNS} FROM chats c \
             WHERE EXISTS(SELECT 1 FROM chat_members m WHERE m.chat_id = c.id AND m.user_id = $1) \
             ORDER BY last_activity_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(chat_from_model).collect()
    }

    #[instrument(skip(self, chat), fields(id = %chat.id))]
    async fn create(&self, chat: &Chat) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chats (id, name, description, avatar_url, chat_type, created_by,
                               created_at, last_activity_at, allow_invites,
                               allow_members_to_invite, max_members)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(chat.id)
        .bind(&chat.name)
        .bind(&chat.description)
        .bind(&chat.avatar_url)
        .bind(chat.chat_type.rank())
        .bind(chat.created_by)
        .bind(chat.created_at)
        .bind(chat.last_activity_at)
        .bind(chat.allow_invites)
        .bind(chat.allow_members_to_invite)
        .bind(chat.max_members)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, chat), fields(id = %chat.id))]
    async fn update(&self, chat: &Chat) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE chats
            SET name = $2, description = $3, avatar_url = $4, allow_invites = $5,
                allow_members_to_invite = $6, max_members = $7
            WHERE id = $1
            "#,
        )
        .bind(chat.id)
        .bind(&chat.name)
        .bind(&chat.description)
        .bind(&chat.avatar_url)
        .bind(chat.allow_invites)
        .bind(chat.allow_members_to_invite)
        .bind(chat.max_members)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(chat_not_found(chat.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM chats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(chat_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn touch_activity(&self, id: Uuid) -> RepoResult<()> {
        sqlx::query("UPDATE chats SET last_activity_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
