//! Message service

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use talk_core::entities::Message;
use talk_core::error::DomainError;
use talk_core::events::{
    DomainEvent, MessageCreatedEvent, MessageDeletedEvent, MessageUpdatedEvent,
};
use talk_core::traits::MessageQuery;
use talk_core::value_objects::ChatRole;

use crate::dto::{CreateMessageRequest, MessageResponse, UpdateMessageRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::policy::ChatPolicyService;

/// Default page size for message listings
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a message into a chat (members only)
    #[instrument(skip(self, request), fields(chat_id = %request.chat_id))]
    pub async fn send_message(
        &self,
        user_id: Uuid,
        request: CreateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;

        ChatPolicyService::new(self.ctx)
            .require_member(request.chat_id, user_id)
            .await?;

        if request.content.chars().count() > Message::MAX_CONTENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: Message::MAX_CONTENT_LENGTH,
            }
            .into());
        }

        let mut message = Message::new(request.chat_id, user_id, request.content);
        message.message_type = request.message_type;
        message.file_url = request.file_url;
        message.file_name = request.file_name;
        message.file_size = request.file_size;
        message.mime_type = request.mime_type;

        self.ctx.message_repo().create(&message).await?;
        self.ctx.chat_repo().touch_activity(message.chat_id).await?;

        info!(message_id = %message.id, chat_id = %message.chat_id, "Message sent");

        self.ctx
            .notifier()
            .notify(DomainEvent::MessageCreated(MessageCreatedEvent {
                chat_id: message.chat_id,
                message_id: message.id,
                user_id,
                at: message.created_at,
            }))
            .await;

        Ok(MessageResponse::from(&message))
    }

    /// List messages, newest first, with a before-cursor
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<MessageResponse>> {
        ChatPolicyService::new(self.ctx)
            .require_member(chat_id, user_id)
            .await?;

        let messages = self
            .ctx
            .message_repo()
            .find_by_chat(
                chat_id,
                MessageQuery {
                    before,
                    limit: limit.unwrap_or(DEFAULT_PAGE_SIZE),
                },
            )
            .await?;

        Ok(messages.iter().map(MessageResponse::from).collect())
    }

    /// Edit a message (author only)
    #[instrument(skip(self, request))]
    pub async fn edit_message(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        request: UpdateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;

        let mut message = self.fetch(message_id).await?;

        if message.user_id != user_id {
            return Err(DomainError::NotMessageAuthor.into());
        }

        message.edit(request.content);
        self.ctx.message_repo().update(&message).await?;

        info!(message_id = %message_id, "Message edited");

        self.ctx
            .notifier()
            .notify(DomainEvent::MessageUpdated(MessageUpdatedEvent {
                chat_id: message.chat_id,
                message_id,
                at: chrono::Utc::now(),
            }))
            .await;

        Ok(MessageResponse::from(&message))
    }

    /// Soft delete a message (author, or Admin/Owner of the chat)
    #[instrument(skip(self))]
    pub async fn delete_message(&self, message_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let message = self.fetch(message_id).await?;

        if message.user_id != user_id {
            ChatPolicyService::new(self.ctx)
                .require_role(message.chat_id, user_id, ChatRole::Admin)
                .await?;
        }

        self.ctx.message_repo().delete(message_id).await?;

        info!(message_id = %message_id, user_id = %user_id, "Message deleted");

        self.ctx
            .notifier()
            .notify(DomainEvent::MessageDeleted(MessageDeletedEvent {
                chat_id: message.chat_id,
                message_id,
                at: chrono::Utc::now(),
            }))
            .await;

        Ok(())
    }

    async fn fetch(&self, message_id: Uuid) -> ServiceResult<Message> {
        self.ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", message_id.to_string()))
    }
}
