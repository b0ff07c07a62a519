//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

use crate::value_objects::ChatRole;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Chat not found: {0}")]
    ChatNotFound(Uuid),

    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    #[error("Member not found in chat")]
    MemberNotFound,

    #[error("Reaction not found")]
    ReactionNotFound,

    /// Keyed by code or by id depending on the lookup
    #[error("Invite link not found: {0}")]
    InviteNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    /// Redemption predicate failed: inactive, suspended, blocked, expired,
    /// or usage-exhausted. Deliberately opaque to the caller.
    #[error("Invite link is invalid or expired")]
    InviteNotRedeemable,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a member of this chat")]
    NotChatMember,

    #[error("Requires at least {0} role in this chat")]
    MissingRole(ChatRole),

    #[error("Not the message author")]
    NotMessageAuthor,

    #[error("Chat owners cannot be removed")]
    CannotRemoveOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already a member of this chat")]
    AlreadyMember,

    #[error("Invite code already exists")]
    InviteCodeExists,

    #[error("Reaction already exists")]
    ReactionAlreadyExists,

    /// Concurrent redemption detected; retried by the lifecycle engine a
    /// bounded number of times before surfacing as a transient conflict.
    #[error("Concurrent redemption detected")]
    RedemptionRace,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Chat owners must transfer ownership before leaving")]
    CannotLeaveOwnedChat,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChatNotFound(_) => "UNKNOWN_CHAT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::MemberNotFound => "UNKNOWN_MEMBER",
            Self::ReactionNotFound => "UNKNOWN_REACTION",
            Self::InviteNotFound(_) => "UNKNOWN_INVITE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InviteNotRedeemable => "INVITE_INVALID_OR_EXPIRED",

            // Authorization
            Self::NotChatMember => "NOT_CHAT_MEMBER",
            Self::MissingRole(_) => "MISSING_ROLE",
            Self::NotMessageAuthor => "NOT_MESSAGE_AUTHOR",
            Self::CannotRemoveOwner => "CANNOT_REMOVE_OWNER",

            // Conflict
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::InviteCodeExists => "INVITE_CODE_EXISTS",
            Self::ReactionAlreadyExists => "REACTION_ALREADY_EXISTS",
            Self::RedemptionRace => "REDEMPTION_RACE",

            // Business Rules
            Self::CannotLeaveOwnedChat => "CANNOT_LEAVE_OWNED_CHAT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ChatNotFound(_)
                | Self::MessageNotFound(_)
                | Self::MemberNotFound
                | Self::ReactionNotFound
                | Self::InviteNotFound(_)
        )
    }

    /// Check if this is a validation error (400-class)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::ContentTooLong { .. }
                | Self::InviteNotRedeemable
                | Self::CannotLeaveOwnedChat
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotChatMember
                | Self::MissingRole(_)
                | Self::NotMessageAuthor
                | Self::CannotRemoveOwner
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyMember
                | Self::InviteCodeExists
                | Self::ReactionAlreadyExists
                | Self::RedemptionRace
        )
    }

    /// Check if a retry of the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RedemptionRace)
    }
}
