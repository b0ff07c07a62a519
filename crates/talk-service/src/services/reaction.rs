//! Reaction service

use tracing::{info, instrument};
use uuid::Uuid;

use talk_core::entities::{Reaction, ReactionType};
use talk_core::events::{DomainEvent, ReactionEvent};

use crate::dto::{AddReactionRequest, ReactionCountResponse, ReactionResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::policy::ChatPolicyService;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a reaction to a message (chat members only)
    #[instrument(skip(self, request))]
    pub async fn add_reaction(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        request: AddReactionRequest,
    ) -> ServiceResult<ReactionResponse> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", message_id.to_string()))?;

        ChatPolicyService::new(self.ctx)
            .require_member(message.chat_id, user_id)
            .await?;

        let reaction = Reaction::new(message_id, user_id, request.reaction_type);
        self.ctx.reaction_repo().create(&reaction).await?;

        info!(message_id = %message_id, user_id = %user_id, "Reaction added");

        self.ctx
            .notifier()
            .notify(DomainEvent::ReactionAdded(ReactionEvent {
                chat_id: message.chat_id,
                message_id,
                user_id,
                at: reaction.created_at,
            }))
            .await;

        Ok(ReactionResponse::from(&reaction))
    }

    /// Remove the caller's reaction of the given type
    #[instrument(skip(self))]
    pub async fn remove_reaction(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        reaction_type: ReactionType,
    ) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", message_id.to_string()))?;

        self.ctx
            .reaction_repo()
            .delete(message_id, user_id, reaction_type)
            .await?;

        info!(message_id = %message_id, user_id = %user_id, "Reaction removed");

        self.ctx
            .notifier()
            .notify(DomainEvent::ReactionRemoved(ReactionEvent {
                chat_id: message.chat_id,
                message_id,
                user_id,
                at: chrono::Utc::now(),
            }))
            .await;

        Ok(())
    }

    /// Per-type reaction counts for a message
    #[instrument(skip(self))]
    pub async fn reaction_counts(&self, message_id: Uuid) -> ServiceResult<Vec<ReactionCountResponse>> {
        let counts = self.ctx.reaction_repo().counts_by_message(message_id).await?;
        Ok(counts.iter().map(ReactionCountResponse::from).collect())
    }
}
