//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{Chat, ChatMember, InviteLink, Message, Reaction, ReactionCount, User};
use crate::error::DomainError;
use crate::value_objects::ChatRole;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Create a new user
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Update profile fields
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Update presence (last seen / online flag)
    async fn touch_presence(&self, id: Uuid, online: bool) -> RepoResult<()>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find chat by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Chat>>;

    /// List chats a user belongs to, most recently active first
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Chat>>;

    /// Create a new chat
    async fn create(&self, chat: &Chat) -> RepoResult<()>;

    /// Update name, description, and invite policy settings
    async fn update(&self, chat: &Chat) -> RepoResult<()>;

    /// Delete a chat and its dependent records
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Bump the last-activity timestamp
    async fn touch_activity(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find membership by chat and user ID
    async fn find(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<Option<ChatMember>>;

    /// List all members of a chat
    async fn find_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<ChatMember>>;

    /// Check if user is a member of chat
    async fn is_member(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<bool>;

    /// Get the user's role in the chat, if any
    async fn role_of(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<Option<ChatRole>>;

    /// Count members of a chat
    async fn count_by_chat(&self, chat_id: Uuid) -> RepoResult<i64>;

    /// Add a member; fails with `AlreadyMember` on a duplicate
    /// (chat_id, user_id) pair regardless of how the caller got here
    async fn create(&self, member: &ChatMember) -> RepoResult<()>;

    /// Change a member's role
    async fn update_role(&self, chat_id: Uuid, user_id: Uuid, role: ChatRole) -> RepoResult<()>;

    /// Stamp the member's read marker with the current time
    async fn update_last_read(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<()>;

    /// Remove a member from a chat
    async fn delete(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Pagination options for message queries
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    /// Only messages created strictly before this instant
    pub before: Option<DateTime<Utc>>,
    pub limit: i64,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID (excluding soft-deleted)
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>>;

    /// List messages in a chat, newest first, with cursor pagination
    async fn find_by_chat(&self, chat_id: Uuid, query: MessageQuery) -> RepoResult<Vec<Message>>;

    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Update message content (edit)
    async fn update(&self, message: &Message) -> RepoResult<()>;

    /// Soft delete a message
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find a user's reaction of a given type on a message
    async fn find(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        reaction_type: crate::entities::ReactionType,
    ) -> RepoResult<Option<Reaction>>;

    /// Get all reactions for a message
    async fn find_by_message(&self, message_id: Uuid) -> RepoResult<Vec<Reaction>>;

    /// Add a reaction; fails with `ReactionAlreadyExists` on a duplicate
    async fn create(&self, reaction: &Reaction) -> RepoResult<()>;

    /// Remove a reaction
    async fn delete(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        reaction_type: crate::entities::ReactionType,
    ) -> RepoResult<()>;

    /// Per-type counts for a message
    async fn counts_by_message(&self, message_id: Uuid) -> RepoResult<Vec<ReactionCount>>;
}

// ============================================================================
// Invite Link Repository
// ============================================================================

/// Result of a redemption attempt that passed the validity gate
#[derive(Debug, Clone)]
pub struct RedeemOutcome {
    pub membership: ChatMember,
    /// False when the user already belonged to the chat (idempotent hit;
    /// the usage counter was not incremented)
    pub newly_joined: bool,
}

#[async_trait]
pub trait InviteLinkRepository: Send + Sync {
    /// Find invite link by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<InviteLink>>;

    /// Find invite link by code
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<InviteLink>>;

    /// Redeemable-eligible links for a chat (active, not suspended, not
    /// blocked), newest first
    async fn find_active_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<InviteLink>>;

    /// Every link for a chat including suspended/blocked/inactive ones,
    /// newest first
    async fn find_all_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<InviteLink>>;

    /// Create a new invite link; fails with `InviteCodeExists` when the
    /// generated code collides with an existing one
    async fn create(&self, link: &InviteLink) -> RepoResult<()>;

    /// Persist mutable fields (expiry, usage limit, active flag)
    async fn update(&self, link: &InviteLink) -> RepoResult<InviteLink>;

    /// Permanently clear the active flag
    async fn deactivate(&self, id: Uuid) -> RepoResult<()>;

    /// Set the suspension hold with its audit fields
    async fn suspend(
        &self,
        id: Uuid,
        suspended_by: Uuid,
        reason: Option<&str>,
    ) -> RepoResult<InviteLink>;

    /// Clear the suspension hold and its audit fields
    async fn unsuspend(&self, id: Uuid) -> RepoResult<InviteLink>;

    /// Set the owner-level block, stamping the shared audit fields
    async fn block(&self, id: Uuid, blocked_by: Uuid) -> RepoResult<InviteLink>;

    /// Clear the block; audit fields survive while a suspension remains
    async fn unblock(&self, id: Uuid) -> RepoResult<InviteLink>;

    /// Permanently remove the record
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Atomically redeem a code for the given user
    ///
    /// The validity predicate, the existing-membership check, the
    /// membership insert, and the counter increment execute as one atomic
    /// unit. Fails with `InviteNotFound`, `InviteNotRedeemable`, or the
    /// retryable `RedemptionRace`.
    async fn redeem(&self, code: &str, user_id: Uuid) -> RepoResult<RedeemOutcome>;
}
