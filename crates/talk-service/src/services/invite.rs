//! Invite lifecycle engine
//!
//! Owns every InviteLink state transition: creation under chat policy,
//! atomic redemption into chat membership, the suspend/unsuspend and
//! block/unblock holds, deactivation, update, and deletion. Authorization
//! is layered per operation: creation follows chat invite settings,
//! suspend/update require Admin, block requires Owner, and
//! deactivate/delete require membership (configurably tightened to Admin).

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use talk_core::entities::InviteLink;
use talk_core::error::DomainError;
use talk_core::events::{
    DomainEvent, InviteCreatedEvent, InviteDeletedEvent, MembershipChange, MembershipChangedEvent,
};
use talk_core::value_objects::ChatRole;

use crate::dto::{
    ChatMemberResponse, CreateInviteLinkRequest, InviteLinkInfoResponse, InviteLinkResponse,
    InviteLinkWithDetails, SuspendInviteLinkRequest, UpdateInviteLinkRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::policy::ChatPolicyService;

/// Invite lifecycle service
pub struct InviteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InviteService<'a> {
    /// Create a new InviteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new invite link for a chat
    ///
    /// The issuer must be a member; if the chat restricts invite creation
    /// to admins, the issuer must hold Admin or Owner. The code is
    /// regenerated on the rare unique-index collision.
    #[instrument(skip(self, request), fields(chat_id = %request.chat_id))]
    pub async fn create_invite(
        &self,
        user_id: Uuid,
        request: CreateInviteLinkRequest,
    ) -> ServiceResult<InviteLinkResponse> {
        request.validate()?;

        let chat = self
            .ctx
            .chat_repo()
            .find_by_id(request.chat_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Chat", request.chat_id.to_string()))?;

        let policy = ChatPolicyService::new(self.ctx);
        policy.require_member(chat.id, user_id).await?;

        let settings = chat.invite_settings();
        if !settings.allow_invites {
            return Err(ServiceError::permission_denied(
                "invite links are disabled for this chat",
            ));
        }
        if !settings.allow_members_to_invite {
            policy.require_role(chat.id, user_id, ChatRole::Admin).await?;
        }

        let expires_at = request.expires_at.unwrap_or_else(|| {
            Utc::now() + Duration::days(self.ctx.invite_config().default_ttl_days)
        });

        let mut link = None;
        for attempt in 0..self.ctx.invite_config().max_code_attempts {
            let code = self.ctx.code_generator().generate();
            let mut candidate = InviteLink::new(chat.id, user_id, code).with_expiry(expires_at);
            if let Some(limit) = request.usage_limit {
                candidate = candidate.with_usage_limit(limit);
            }

            match self.ctx.invite_repo().create(&candidate).await {
                Ok(()) => {
                    link = Some(candidate);
                    break;
                }
                Err(DomainError::InviteCodeExists) => {
                    warn!(attempt, chat_id = %chat.id, "Invite code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let link = link.ok_or_else(|| {
            ServiceError::internal("could not generate a unique invite code")
        })?;

        info!(
            id = %link.id,
            code = %link.code,
            chat_id = %chat.id,
            created_by = %user_id,
            "Invite link created"
        );

        self.ctx
            .notifier()
            .notify(DomainEvent::InviteCreated(InviteCreatedEvent {
                chat_id: chat.id,
                invite_id: link.id,
                created_by: user_id,
                at: link.created_at,
            }))
            .await;

        self.to_response(link).await
    }

    /// Anonymous-accessible invite preview
    ///
    /// Exposes chat name/description/member count plus the expiry,
    /// usage-exhaustion, and active flags. Suspension and block state are
    /// deliberately absent from the response type.
    #[instrument(skip(self))]
    pub async fn get_invite_info(
        &self,
        code: &str,
        viewer: Option<Uuid>,
    ) -> ServiceResult<InviteLinkInfoResponse> {
        let link = self
            .ctx
            .invite_repo()
            .find_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::not_found("Invite", code.to_string()))?;

        let chat = self
            .ctx
            .chat_repo()
            .find_by_id(link.chat_id)
            .await?
            .ok_or_else(|| ServiceError::internal("Invite chat not found"))?;

        let member_count = self.ctx.member_repo().count_by_chat(chat.id).await?;

        let is_user_already_member = match viewer {
            Some(user_id) => self.ctx.member_repo().is_member(chat.id, user_id).await?,
            None => false,
        };

        Ok(InviteLinkInfoResponse {
            invite_code: link.code.clone(),
            chat_name: chat.name,
            chat_description: chat.description.unwrap_or_default(),
            member_count,
            is_expired: link.is_expired(),
            is_usage_limit_reached: link.is_exhausted(),
            is_active: link.is_active,
            is_user_already_member,
        })
    }

    /// Redeem a code, admitting the user into the chat
    ///
    /// Idempotent for existing members (no counter increment). Races
    /// detected by the store are retried transparently a bounded number of
    /// times, then surfaced as a transient conflict.
    #[instrument(skip(self))]
    pub async fn redeem_invite(&self, code: &str, user_id: Uuid) -> ServiceResult<ChatMemberResponse> {
        let retries = self.ctx.invite_config().redeem_retries;
        let mut attempt = 0;

        let outcome = loop {
            match self.ctx.invite_repo().redeem(code, user_id).await {
                Ok(outcome) => break outcome,
                Err(e) if e.is_retryable() && attempt < retries => {
                    attempt += 1;
                    warn!(code, attempt, "Redemption raced, retrying");
                }
                Err(DomainError::RedemptionRace) => {
                    return Err(ServiceError::conflict(
                        "invite redemption raced repeatedly, try again",
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        };

        if outcome.newly_joined {
            info!(
                code,
                user_id = %user_id,
                chat_id = %outcome.membership.chat_id,
                "Invite redeemed"
            );

            self.ctx
                .notifier()
                .notify(DomainEvent::MembershipChanged(MembershipChangedEvent {
                    chat_id: outcome.membership.chat_id,
                    user_id,
                    change: MembershipChange::Joined,
                    role: Some(outcome.membership.role),
                    at: outcome.membership.joined_at,
                }))
                .await;
        }

        Ok(ChatMemberResponse::from(&outcome.membership))
    }

    /// List a chat's invite links
    ///
    /// Ordinary members see only redeemable-eligible links; admins and the
    /// owner also see suspended/blocked/inactive ones.
    #[instrument(skip(self))]
    pub async fn list_chat_invites(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<Vec<InviteLinkResponse>> {
        let policy = ChatPolicyService::new(self.ctx);
        policy.require_member(chat_id, user_id).await?;

        let elevated = policy
            .role_of(chat_id, user_id)
            .await?
            .is_some_and(|role| role.at_least(ChatRole::Admin));

        let links = if elevated {
            self.ctx.invite_repo().find_all_by_chat(chat_id).await?
        } else {
            self.ctx.invite_repo().find_active_by_chat(chat_id).await?
        };

        let mut responses = Vec::with_capacity(links.len());
        for link in links {
            responses.push(self.to_response(link).await?);
        }

        Ok(responses)
    }

    /// Update expiry, usage limit, or the active flag (Admin/Owner only)
    ///
    /// Reactivation is rejected: a deactivated link stays deactivated.
    #[instrument(skip(self, request))]
    pub async fn update_invite(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateInviteLinkRequest,
    ) -> ServiceResult<InviteLinkResponse> {
        request.validate()?;

        let mut link = self.fetch(id).await?;

        let policy = ChatPolicyService::new(self.ctx);
        policy.require_role(link.chat_id, user_id, ChatRole::Admin).await?;

        if request.is_active == Some(true) && !link.is_active {
            return Err(ServiceError::validation(
                "deactivated invite links cannot be reactivated",
            ));
        }

        if let Some(expires_at) = request.expires_at {
            link.expires_at = expires_at;
        }
        if let Some(limit) = request.usage_limit {
            link.usage_limit = Some(limit);
        }
        if let Some(active) = request.is_active {
            link.is_active = active;
        }

        let updated = self.ctx.invite_repo().update(&link).await?;

        info!(id = %id, user_id = %user_id, "Invite link updated");

        self.to_response(updated).await
    }

    /// Place a reversible admin hold on the link
    ///
    /// Suspending an already-suspended link is a no-op success; the
    /// original audit trail is preserved.
    #[instrument(skip(self, request))]
    pub async fn suspend_invite(
        &self,
        id: Uuid,
        actor_id: Uuid,
        request: SuspendInviteLinkRequest,
    ) -> ServiceResult<InviteLinkResponse> {
        request.validate()?;

        let link = self.fetch(id).await?;

        let policy = ChatPolicyService::new(self.ctx);
        policy.require_role(link.chat_id, actor_id, ChatRole::Admin).await?;

        if link.is_suspended {
            return self.to_response(link).await;
        }

        let updated = self
            .ctx
            .invite_repo()
            .suspend(id, actor_id, request.reason.as_deref())
            .await?;

        info!(id = %id, actor_id = %actor_id, "Invite link suspended");

        self.to_response(updated).await
    }

    /// Lift a suspension hold; no-op when not suspended
    #[instrument(skip(self))]
    pub async fn unsuspend_invite(&self, id: Uuid, actor_id: Uuid) -> ServiceResult<InviteLinkResponse> {
        let link = self.fetch(id).await?;

        let policy = ChatPolicyService::new(self.ctx);
        policy.require_role(link.chat_id, actor_id, ChatRole::Admin).await?;

        if !link.is_suspended {
            return self.to_response(link).await;
        }

        let updated = self.ctx.invite_repo().unsuspend(id).await?;

        info!(id = %id, actor_id = %actor_id, "Invite link unsuspended");

        self.to_response(updated).await
    }

    /// Place the owner-only block hold
    ///
    /// Stamps the shared suspended_by/suspended_at audit fields without
    /// touching the suspension flag or reason.
    #[instrument(skip(self))]
    pub async fn block_invite(&self, id: Uuid, actor_id: Uuid) -> ServiceResult<InviteLinkResponse> {
        let link = self.fetch(id).await?;

        let policy = ChatPolicyService::new(self.ctx);
        policy.require_role(link.chat_id, actor_id, ChatRole::Owner).await?;

        let updated = self.ctx.invite_repo().block(id, actor_id).await?;

        info!(id = %id, actor_id = %actor_id, "Invite link blocked");

        self.to_response(updated).await
    }

    /// Lift the block hold (Owner only); no-op when not blocked
    ///
    /// Audit fields survive while the link is also suspended.
    #[instrument(skip(self))]
    pub async fn unblock_invite(&self, id: Uuid, actor_id: Uuid) -> ServiceResult<InviteLinkResponse> {
        let link = self.fetch(id).await?;

        let policy = ChatPolicyService::new(self.ctx);
        policy.require_role(link.chat_id, actor_id, ChatRole::Owner).await?;

        if !link.is_blocked {
            return self.to_response(link).await;
        }

        let updated = self.ctx.invite_repo().unblock(id).await?;

        info!(id = %id, actor_id = %actor_id, "Invite link unblocked");

        self.to_response(updated).await
    }

    /// Permanently withdraw the link from redemption
    ///
    /// There is no reactivate operation; recreate the link instead.
    #[instrument(skip(self))]
    pub async fn deactivate_invite(&self, id: Uuid, actor_id: Uuid) -> ServiceResult<InviteLinkResponse> {
        let mut link = self.fetch(id).await?;

        self.require_manage(link.chat_id, actor_id).await?;

        self.ctx.invite_repo().deactivate(id).await?;
        link.is_active = false;

        info!(id = %id, actor_id = %actor_id, "Invite link deactivated");

        self.to_response(link).await
    }

    /// Permanently remove the link record
    #[instrument(skip(self))]
    pub async fn delete_invite(&self, id: Uuid, actor_id: Uuid) -> ServiceResult<()> {
        let link = self.fetch(id).await?;

        self.require_manage(link.chat_id, actor_id).await?;

        self.ctx.invite_repo().delete(id).await?;

        info!(id = %id, actor_id = %actor_id, "Invite link deleted");

        self.ctx
            .notifier()
            .notify(DomainEvent::InviteDeleted(InviteDeletedEvent {
                chat_id: link.chat_id,
                invite_id: link.id,
                at: Utc::now(),
            }))
            .await;

        Ok(())
    }

    /// Authorization gate for deactivate/delete
    ///
    /// Bare membership suffices by default, matching upstream behavior
    /// where any member could retire any link; `manage_requires_admin`
    /// tightens both operations to Admin.
    async fn require_manage(&self, chat_id: Uuid, actor_id: Uuid) -> ServiceResult<()> {
        let policy = ChatPolicyService::new(self.ctx);
        if self.ctx.invite_config().manage_requires_admin {
            policy.require_role(chat_id, actor_id, ChatRole::Admin).await
        } else {
            policy.require_member(chat_id, actor_id).await
        }
    }

    async fn fetch(&self, id: Uuid) -> ServiceResult<InviteLink> {
        self.ctx
            .invite_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Invite", id.to_string()))
    }

    /// Assemble the full-detail response for members and admins
    async fn to_response(&self, link: InviteLink) -> ServiceResult<InviteLinkResponse> {
        let chat = self
            .ctx
            .chat_repo()
            .find_by_id(link.chat_id)
            .await?
            .ok_or_else(|| ServiceError::internal("Invite chat not found"))?;

        let created_by = self
            .ctx
            .user_repo()
            .find_by_id(link.created_by)
            .await?
            .ok_or_else(|| ServiceError::internal("Invite creator not found"))?;

        let suspended_by = match link.suspended_by {
            Some(user_id) => self.ctx.user_repo().find_by_id(user_id).await?,
            None => None,
        };

        Ok(InviteLinkResponse::from(InviteLinkWithDetails {
            link,
            chat_name: chat.name,
            created_by,
            suspended_by,
        }))
    }
}

#[cfg(test)]
mod tests {
    // Lifecycle behavior is covered end to end in tests/invite_lifecycle.rs
    // and tests/invite_concurrency.rs against in-memory stores.
}
