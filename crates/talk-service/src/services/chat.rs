//! Chat service
//!
//! Chat creation, settings, and membership management outside the invite
//! path. Direct membership mutations here rely on the same store-level
//! uniqueness guarantee the redemption engine does.

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use talk_core::entities::{Chat, ChatMember};
use talk_core::error::DomainError;
use talk_core::events::{
    ChatCreatedEvent, ChatUpdatedEvent, DomainEvent, MembershipChange, MembershipChangedEvent,
};
use talk_core::value_objects::ChatRole;

use crate::dto::{
    ChatMemberResponse, ChatResponse, ChatSummaryResponse, ChatWithCounts, ChatWithMembers,
    CreateChatRequest, UpdateChatRequest, UpdateMemberRoleRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::policy::ChatPolicyService;

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a chat; the creator becomes Owner, listed users join as Members
    #[instrument(skip(self, request))]
    pub async fn create_chat(
        &self,
        user_id: Uuid,
        request: CreateChatRequest,
    ) -> ServiceResult<ChatResponse> {
        request.validate()?;

        let mut chat = Chat::new(request.name, request.chat_type, user_id);
        chat.description = request.description;
        chat.avatar_url = request.avatar_url;
        chat.allow_invites = request.allow_invites;
        chat.allow_members_to_invite = request.allow_members_to_invite;
        chat.max_members = request.max_members;

        self.ctx.chat_repo().create(&chat).await?;

        let owner = ChatMember::new(chat.id, user_id, ChatRole::Owner);
        self.ctx.member_repo().create(&owner).await?;

        for invitee in request.user_ids {
            if invitee == user_id {
                continue;
            }
            let member = ChatMember::new(chat.id, invitee, ChatRole::Member);
            match self.ctx.member_repo().create(&member).await {
                Ok(()) | Err(DomainError::AlreadyMember) => {}
                Err(e) => return Err(e.into()),
            }
        }

        info!(chat_id = %chat.id, created_by = %user_id, "Chat created");

        self.ctx
            .notifier()
            .notify(DomainEvent::ChatCreated(ChatCreatedEvent {
                chat_id: chat.id,
                created_by: user_id,
                at: chat.created_at,
            }))
            .await;

        self.to_response(chat).await
    }

    /// Get a chat with its member list (members only)
    #[instrument(skip(self))]
    pub async fn get_chat(&self, chat_id: Uuid, user_id: Uuid) -> ServiceResult<ChatResponse> {
        ChatPolicyService::new(self.ctx)
            .require_member(chat_id, user_id)
            .await?;

        let chat = self.fetch(chat_id).await?;
        self.to_response(chat).await
    }

    /// List the chats a user belongs to, most recently active first
    #[instrument(skip(self))]
    pub async fn list_user_chats(&self, user_id: Uuid) -> ServiceResult<Vec<ChatSummaryResponse>> {
        let chats = self.ctx.chat_repo().find_by_user(user_id).await?;

        let mut responses = Vec::with_capacity(chats.len());
        for chat in chats {
            let member_count = self.ctx.member_repo().count_by_chat(chat.id).await?;
            responses.push(ChatSummaryResponse::from(ChatWithCounts { chat, member_count }));
        }

        Ok(responses)
    }

    /// Update chat settings (Admin/Owner only)
    #[instrument(skip(self, request))]
    pub async fn update_chat(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        request: UpdateChatRequest,
    ) -> ServiceResult<ChatResponse> {
        request.validate()?;

        ChatPolicyService::new(self.ctx)
            .require_role(chat_id, user_id, ChatRole::Admin)
            .await?;

        let mut chat = self.fetch(chat_id).await?;

        if let Some(name) = request.name {
            chat.name = name;
        }
        if let Some(description) = request.description {
            chat.description = Some(description);
        }
        if let Some(avatar_url) = request.avatar_url {
            chat.avatar_url = Some(avatar_url);
        }
        if let Some(allow_invites) = request.allow_invites {
            chat.allow_invites = allow_invites;
        }
        if let Some(allow_members_to_invite) = request.allow_members_to_invite {
            chat.allow_members_to_invite = allow_members_to_invite;
        }
        if let Some(max_members) = request.max_members {
            chat.max_members = Some(max_members);
        }

        self.ctx.chat_repo().update(&chat).await?;

        info!(chat_id = %chat_id, user_id = %user_id, "Chat settings updated");

        self.ctx
            .notifier()
            .notify(DomainEvent::ChatUpdated(ChatUpdatedEvent {
                chat_id,
                at: chrono::Utc::now(),
            }))
            .await;

        self.to_response(chat).await
    }

    /// Add a user directly (Admin/Owner only)
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        chat_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> ServiceResult<ChatMemberResponse> {
        ChatPolicyService::new(self.ctx)
            .require_role(chat_id, actor_id, ChatRole::Admin)
            .await?;

        let member = ChatMember::new(chat_id, target_id, ChatRole::Member);
        self.ctx.member_repo().create(&member).await?;

        info!(chat_id = %chat_id, user_id = %target_id, "Member added");

        self.ctx
            .notifier()
            .notify(DomainEvent::MembershipChanged(MembershipChangedEvent {
                chat_id,
                user_id: target_id,
                change: MembershipChange::Joined,
                role: Some(member.role),
                at: member.joined_at,
            }))
            .await;

        Ok(ChatMemberResponse::from(&member))
    }

    /// Remove a member (Admin/Owner only); the owner cannot be removed
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        chat_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> ServiceResult<()> {
        let policy = ChatPolicyService::new(self.ctx);
        policy.require_role(chat_id, actor_id, ChatRole::Admin).await?;

        if policy.role_of(chat_id, target_id).await? == Some(ChatRole::Owner) {
            return Err(DomainError::CannotRemoveOwner.into());
        }

        self.ctx.member_repo().delete(chat_id, target_id).await?;

        info!(chat_id = %chat_id, user_id = %target_id, "Member removed");

        self.notify_left(chat_id, target_id).await;

        Ok(())
    }

    /// Leave a chat; owners must transfer ownership first
    #[instrument(skip(self))]
    pub async fn leave_chat(&self, chat_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let policy = ChatPolicyService::new(self.ctx);
        match policy.role_of(chat_id, user_id).await? {
            None => return Err(DomainError::NotChatMember.into()),
            Some(ChatRole::Owner) => return Err(DomainError::CannotLeaveOwnedChat.into()),
            Some(_) => {}
        }

        self.ctx.member_repo().delete(chat_id, user_id).await?;

        info!(chat_id = %chat_id, user_id = %user_id, "Member left");

        self.notify_left(chat_id, user_id).await;

        Ok(())
    }

    /// Change a member's role (Owner only)
    #[instrument(skip(self, request))]
    pub async fn update_member_role(
        &self,
        chat_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
        request: UpdateMemberRoleRequest,
    ) -> ServiceResult<ChatMemberResponse> {
        let role = request.role;

        ChatPolicyService::new(self.ctx)
            .require_role(chat_id, actor_id, ChatRole::Owner)
            .await?;

        if actor_id == target_id {
            return Err(ServiceError::validation(
                "owners cannot change their own role",
            ));
        }

        self.ctx.member_repo().update_role(chat_id, target_id, role).await?;

        let member = self
            .ctx
            .member_repo()
            .find(chat_id, target_id)
            .await?
            .ok_or(DomainError::MemberNotFound)?;

        info!(chat_id = %chat_id, user_id = %target_id, role = %role, "Member role updated");

        self.ctx
            .notifier()
            .notify(DomainEvent::MembershipChanged(MembershipChangedEvent {
                chat_id,
                user_id: target_id,
                change: MembershipChange::RoleChanged,
                role: Some(role),
                at: chrono::Utc::now(),
            }))
            .await;

        Ok(ChatMemberResponse::from(&member))
    }

    /// Stamp the caller's read marker
    #[instrument(skip(self))]
    pub async fn mark_read(&self, chat_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        ChatPolicyService::new(self.ctx)
            .require_member(chat_id, user_id)
            .await?;

        self.ctx.member_repo().update_last_read(chat_id, user_id).await?;

        Ok(())
    }

    async fn notify_left(&self, chat_id: Uuid, user_id: Uuid) {
        self.ctx
            .notifier()
            .notify(DomainEvent::MembershipChanged(MembershipChangedEvent {
                chat_id,
                user_id,
                change: MembershipChange::Left,
                role: None,
                at: chrono::Utc::now(),
            }))
            .await;
    }

    async fn fetch(&self, chat_id: Uuid) -> ServiceResult<Chat> {
        self.ctx
            .chat_repo()
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Chat", chat_id.to_string()))
    }

    async fn to_response(&self, chat: Chat) -> ServiceResult<ChatResponse> {
        let members = self.ctx.member_repo().find_by_chat(chat.id).await?;
        let member_count = members.len() as i64;

        Ok(ChatResponse::from(ChatWithMembers {
            chat,
            members,
            member_count,
        }))
    }
}
