//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use talk_core::entities::Message;
use talk_core::traits::{MessageQuery, MessageRepository, RepoResult};

use crate::mappers::message_from_model;
use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found};

const MESSAGE_COLUMNS: &str = "id, chat_id, user_id, content, message_type, file_url, file_name, \
     file_size, mime_type, created_at, edited_at, is_deleted";

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1 AND NOT is_deleted"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(message_from_model).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_chat(&self, chat_id: Uuid, query: MessageQuery) -> RepoResult<Vec<Message>> {
        let limit = query.limit.clamp(1, 100);

        let results = match query.before {
            Some(before) => {
                sqlx::query_as::<_, MessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages \
                     WHERE chat_id = $1 AND NOT is_deleted AND created_at < $2 \
                     ORDER BY created_at DESC \
                     LIMIT $3"
                ))
                .bind(chat_id)
                .bind(before)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages \
                     WHERE chat_id = $1 AND NOT is_deleted \
                     ORDER BY created_at DESC \
                     LIMIT $2"
                ))
                .bind(chat_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        results.into_iter().map(message_from_model).collect()
    }

    #[instrument(skip(self, message), fields(id = %message.id, chat_id = %message.chat_id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, chat_id, user_id, content, message_type, file_url,
                                  file_name, file_size, mime_type, created_at, is_deleted)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(message.id)
        .bind(message.chat_id)
        .bind(message.user_id)
        .bind(&message.content)
        .bind(message.message_type.rank())
        .bind(&message.file_url)
        .bind(&message.file_name)
        .bind(message.file_size)
        .bind(&message.mime_type)
        .bind(message.created_at)
        .bind(message.is_deleted)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, message), fields(id = %message.id))]
    async fn update(&self, message: &Message) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET content = $2, edited_at = $3
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(message.id)
        .bind(&message.content)
        .bind(message.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(message.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
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
        assert_send_sync::<PgMessageRepository>();
    }
}
