//! Response DTOs for service operations
//!
//! All response DTOs implement `Serialize` for JSON output. UUIDs are
//! serialized as strings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use talk_core::entities::{ChatType, MessageType, ReactionType};
use talk_core::value_objects::ChatRole;

// ============================================================================
// User Responses
// ============================================================================

/// Public user response
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub last_seen_at: DateTime<Utc>,
}

// ============================================================================
// Membership Responses
// ============================================================================

/// Chat membership response
#[derive(Debug, Clone, Serialize)]
pub struct ChatMemberResponse {
    pub id: String,
    pub chat_id: String,
    pub user_id: String,
    pub role: ChatRole,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_read_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Chat Responses
// ============================================================================

/// Chat listing entry without the member list
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummaryResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub chat_type: ChatType,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub allow_invites: bool,
    pub allow_members_to_invite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_members: Option<i32>,
    pub member_count: i64,
}

/// Full chat response with members
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub chat_type: ChatType,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub allow_invites: bool,
    pub allow_members_to_invite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_members: Option<i32>,
    pub member_count: i64,
    pub members: Vec<ChatMemberResponse>,
}

// ============================================================================
// Message Responses
// ============================================================================

/// Message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub chat_id: String,
    pub user_id: String,
    pub content: String,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// Reaction response
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub message_id: String,
    pub user_id: String,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

/// Per-type reaction count
#[derive(Debug, Clone, Serialize)]
pub struct ReactionCountResponse {
    pub reaction_type: ReactionType,
    pub count: i64,
}

// ============================================================================
// Invite Responses
// ============================================================================

/// Full invite link response, visible to chat members and admins
#[derive(Debug, Clone, Serialize)]
pub struct InviteLinkResponse {
    pub id: String,
    pub chat_id: String,
    pub chat_name: String,
    pub invite_code: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub is_suspended: bool,
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspension_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended_by: Option<UserResponse>,
    pub created_at: DateTime<Utc>,
    pub created_by: UserResponse,
}

/// Anonymous-accessible invite preview
///
/// Carries no suspension or block state; unauthenticated callers only see
/// the active flag and the derived expiry/usage indicators.
#[derive(Debug, Clone, Serialize)]
pub struct InviteLinkInfoResponse {
    pub invite_code: String,
    pub chat_name: String,
    pub chat_description: String,
    pub member_count: i64,
    pub is_expired: bool,
    pub is_usage_limit_reached: bool,
    pub is_active: bool,
    pub is_user_already_member: bool,
}
