//! Chat policy gateway
//!
//! Read-only authorization checks over chat membership and chat-level
//! invite settings. Consulted by every mutating service before a state
//! transition; never mutates chat settings itself.

use tracing::instrument;
use uuid::Uuid;

use talk_core::entities::InviteSettings;
use talk_core::error::DomainError;
use talk_core::value_objects::ChatRole;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Chat policy gateway for access control
pub struct ChatPolicyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatPolicyService<'a> {
    /// Create a new ChatPolicyService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check if a user belongs to a chat
    #[instrument(skip(self))]
    pub async fn is_member(&self, chat_id: Uuid, user_id: Uuid) -> ServiceResult<bool> {
        self.ctx
            .member_repo()
            .is_member(chat_id, user_id)
            .await
            .map_err(ServiceError::from)
    }

    /// Get the user's role in the chat, if any
    #[instrument(skip(self))]
    pub async fn role_of(&self, chat_id: Uuid, user_id: Uuid) -> ServiceResult<Option<ChatRole>> {
        self.ctx
            .member_repo()
            .role_of(chat_id, user_id)
            .await
            .map_err(ServiceError::from)
    }

    /// Require chat membership, any role
    #[instrument(skip(self))]
    pub async fn require_member(&self, chat_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        if !self.is_member(chat_id, user_id).await? {
            return Err(DomainError::NotChatMember.into());
        }
        Ok(())
    }

    /// Require at least the given role in the chat
    ///
    /// Non-members fail the same way as members below the threshold.
    #[instrument(skip(self))]
    pub async fn require_role(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        minimum: ChatRole,
    ) -> ServiceResult<()> {
        match self.role_of(chat_id, user_id).await? {
            Some(role) if role.at_least(minimum) => Ok(()),
            Some(_) => Err(DomainError::MissingRole(minimum).into()),
            None => Err(DomainError::NotChatMember.into()),
        }
    }

    /// Chat-level invite settings, for the invite lifecycle engine
    #[instrument(skip(self))]
    pub async fn invite_settings(&self, chat_id: Uuid) -> ServiceResult<InviteSettings> {
        let chat = self
            .ctx
            .chat_repo()
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Chat", chat_id.to_string()))?;

        Ok(chat.invite_settings())
    }
}
