//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use talk_core::entities::{Chat, ChatMember, InviteLink, Message, Reaction, ReactionCount, User};

use super::responses::{
    ChatMemberResponse, ChatResponse, ChatSummaryResponse, InviteLinkResponse, MessageResponse,
    ReactionCountResponse, ReactionResponse, UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
            is_online: user.is_online,
            last_seen_at: user.last_seen_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Membership Mappers
// ============================================================================

impl From<&ChatMember> for ChatMemberResponse {
    fn from(member: &ChatMember) -> Self {
        Self {
            id: member.id.to_string(),
            chat_id: member.chat_id.to_string(),
            user_id: member.user_id.to_string(),
            role: member.role,
            joined_at: member.joined_at,
            last_read_at: member.last_read_at,
        }
    }
}

// ============================================================================
// Chat Mappers
// ============================================================================

/// Chat plus its member count, for listing responses
#[derive(Debug, Clone)]
pub struct ChatWithCounts {
    pub chat: Chat,
    pub member_count: i64,
}

impl From<ChatWithCounts> for ChatSummaryResponse {
    fn from(data: ChatWithCounts) -> Self {
        let chat = data.chat;
        Self {
            id: chat.id.to_string(),
            name: chat.name,
            description: chat.description,
            avatar_url: chat.avatar_url,
            chat_type: chat.chat_type,
            created_by: chat.created_by.to_string(),
            created_at: chat.created_at,
            last_activity_at: chat.last_activity_at,
            allow_invites: chat.allow_invites,
            allow_members_to_invite: chat.allow_members_to_invite,
            max_members: chat.max_members,
            member_count: data.member_count,
        }
    }
}

/// Chat plus its full member list
#[derive(Debug, Clone)]
pub struct ChatWithMembers {
    pub chat: Chat,
    pub members: Vec<ChatMember>,
    pub member_count: i64,
}

impl From<ChatWithMembers> for ChatResponse {
    fn from(data: ChatWithMembers) -> Self {
        let chat = data.chat;
        Self {
            id: chat.id.to_string(),
            name: chat.name,
            description: chat.description,
            avatar_url: chat.avatar_url,
            chat_type: chat.chat_type,
            created_by: chat.created_by.to_string(),
            created_at: chat.created_at,
            last_activity_at: chat.last_activity_at,
            allow_invites: chat.allow_invites,
            allow_members_to_invite: chat.allow_members_to_invite,
            max_members: chat.max_members,
            member_count: data.member_count,
            members: data.members.iter().map(ChatMemberResponse::from).collect(),
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            chat_id: message.chat_id.to_string(),
            user_id: message.user_id.to_string(),
            content: message.content.clone(),
            message_type: message.message_type,
            file_url: message.file_url.clone(),
            file_name: message.file_name.clone(),
            file_size: message.file_size,
            mime_type: message.mime_type.clone(),
            created_at: message.created_at,
            edited_at: message.edited_at,
        }
    }
}

// ============================================================================
// Reaction Mappers
// ============================================================================

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            message_id: reaction.message_id.to_string(),
            user_id: reaction.user_id.to_string(),
            reaction_type: reaction.reaction_type,
            created_at: reaction.created_at,
        }
    }
}

impl From<&ReactionCount> for ReactionCountResponse {
    fn from(count: &ReactionCount) -> Self {
        Self {
            reaction_type: count.reaction_type,
            count: count.count,
        }
    }
}

// ============================================================================
// Invite Mappers
// ============================================================================

/// Invite link plus the related records its response embeds
#[derive(Debug, Clone)]
pub struct InviteLinkWithDetails {
    pub link: InviteLink,
    pub chat_name: String,
    pub created_by: User,
    pub suspended_by: Option<User>,
}

impl From<InviteLinkWithDetails> for InviteLinkResponse {
    fn from(data: InviteLinkWithDetails) -> Self {
        let link = data.link;
        Self {
            id: link.id.to_string(),
            chat_id: link.chat_id.to_string(),
            chat_name: data.chat_name,
            invite_code: link.code,
            expires_at: link.expires_at,
            usage_limit: link.usage_limit,
            used_count: link.used_count,
            is_active: link.is_active,
            is_suspended: link.is_suspended,
            is_blocked: link.is_blocked,
            suspension_reason: link.suspension_reason,
            suspended_at: link.suspended_at,
            suspended_by: data.suspended_by.map(UserResponse::from),
            created_at: link.created_at,
            created_by: UserResponse::from(data.created_by),
        }
    }
}
