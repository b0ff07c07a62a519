//! Request DTOs for service operations
//!
//! All request DTOs implement `Deserialize` and, where they carry
//! constraints, `Validate` for input validation before any persistence call.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use talk_core::entities::{ChatType, MessageType, ReactionType};
use talk_core::value_objects::ChatRole;

fn default_true() -> bool {
    true
}

// ============================================================================
// Invite Requests
// ============================================================================

/// Create invite link request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInviteLinkRequest {
    pub chat_id: Uuid,

    /// Defaults to 7 days from creation when omitted
    pub expires_at: Option<DateTime<Utc>>,

    /// None = unlimited redemptions
    #[validate(range(min = 1, message = "Usage limit must be at least 1"))]
    pub usage_limit: Option<i32>,
}

/// Update invite link request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInviteLinkRequest {
    pub expires_at: Option<DateTime<Utc>>,

    #[validate(range(min = 1, message = "Usage limit must be at least 1"))]
    pub usage_limit: Option<i32>,

    /// Only false is actionable; deactivated links cannot be reactivated
    pub is_active: Option<bool>,
}

/// Suspend invite link request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SuspendInviteLinkRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

// ============================================================================
// Chat Requests
// ============================================================================

/// Create chat request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChatRequest {
    #[validate(length(min = 1, max = 100, message = "Chat name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub avatar_url: Option<String>,

    #[serde(default)]
    pub chat_type: ChatType,

    /// Users added as Members alongside the creator (Owner)
    #[serde(default)]
    pub user_ids: Vec<Uuid>,

    #[serde(default = "default_true")]
    pub allow_invites: bool,

    #[serde(default = "default_true")]
    pub allow_members_to_invite: bool,

    #[validate(range(min = 2, message = "Max members must be at least 2"))]
    pub max_members: Option<i32>,
}

/// Update chat settings request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateChatRequest {
    #[validate(length(min = 1, max = 100, message = "Chat name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub avatar_url: Option<String>,

    pub allow_invites: Option<bool>,

    pub allow_members_to_invite: Option<bool>,

    #[validate(range(min = 2, message = "Max members must be at least 2"))]
    pub max_members: Option<i32>,
}

/// Change a member's role request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: ChatRole,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Create message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessageRequest {
    pub chat_id: Uuid,

    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: String,

    #[serde(default)]
    pub message_type: MessageType,

    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
}

/// Edit message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: String,
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Add reaction request
#[derive(Debug, Clone, Deserialize)]
pub struct AddReactionRequest {
    pub reaction_type: ReactionType,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update own profile request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 64, message = "Display name must be at most 64 characters"))]
    pub display_name: Option<String>,

    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_limit_validation() {
        let valid = CreateInviteLinkRequest {
            chat_id: Uuid::new_v4(),
            expires_at: None,
            usage_limit: Some(5),
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateInviteLinkRequest {
            chat_id: Uuid::new_v4(),
            expires_at: None,
            usage_limit: Some(0),
        };
        assert!(invalid.validate().is_err());

        let unlimited = CreateInviteLinkRequest {
            chat_id: Uuid::new_v4(),
            expires_at: None,
            usage_limit: None,
        };
        assert!(unlimited.validate().is_ok());
    }

    #[test]
    fn test_chat_name_validation() {
        let request = CreateChatRequest {
            name: String::new(),
            description: None,
            avatar_url: None,
            chat_type: ChatType::Group,
            user_ids: vec![],
            allow_invites: true,
            allow_members_to_invite: true,
            max_members: None,
        };
        assert!(request.validate().is_err());
    }
}
