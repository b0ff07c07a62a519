//! Domain events - events emitted when domain state changes
//!
//! Delivered to the notification sink collaborator; the emitting side never
//! awaits delivery confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::ChatRole;

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Membership Events
    // =========================================================================
    MembershipChanged(MembershipChangedEvent),

    // =========================================================================
    // Chat Events
    // =========================================================================
    ChatCreated(ChatCreatedEvent),
    ChatUpdated(ChatUpdatedEvent),

    // =========================================================================
    // Message Events
    // =========================================================================
    MessageCreated(MessageCreatedEvent),
    MessageUpdated(MessageUpdatedEvent),
    MessageDeleted(MessageDeletedEvent),

    // =========================================================================
    // Reaction Events
    // =========================================================================
    ReactionAdded(ReactionEvent),
    ReactionRemoved(ReactionEvent),

    // =========================================================================
    // Invite Events
    // =========================================================================
    InviteCreated(InviteCreatedEvent),
    InviteDeleted(InviteDeletedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MembershipChanged(_) => "MEMBERSHIP_CHANGED",
            Self::ChatCreated(_) => "CHAT_CREATED",
            Self::ChatUpdated(_) => "CHAT_UPDATED",
            Self::MessageCreated(_) => "MESSAGE_CREATED",
            Self::MessageUpdated(_) => "MESSAGE_UPDATED",
            Self::MessageDeleted(_) => "MESSAGE_DELETED",
            Self::ReactionAdded(_) => "REACTION_ADDED",
            Self::ReactionRemoved(_) => "REACTION_REMOVED",
            Self::InviteCreated(_) => "INVITE_CREATED",
            Self::InviteDeleted(_) => "INVITE_DELETED",
        }
    }

    /// The chat whose subscribers should receive this event
    pub fn chat_id(&self) -> Uuid {
        match self {
            Self::MembershipChanged(e) => e.chat_id,
            Self::ChatCreated(e) => e.chat_id,
            Self::ChatUpdated(e) => e.chat_id,
            Self::MessageCreated(e) => e.chat_id,
            Self::MessageUpdated(e) => e.chat_id,
            Self::MessageDeleted(e) => e.chat_id,
            Self::ReactionAdded(e) | Self::ReactionRemoved(e) => e.chat_id,
            Self::InviteCreated(e) => e.chat_id,
            Self::InviteDeleted(e) => e.chat_id,
        }
    }
}

/// What happened to a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipChange {
    Joined,
    Left,
    RoleChanged,
}

/// A user joined, left, or changed role in a chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipChangedEvent {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub change: MembershipChange,
    pub role: Option<ChatRole>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCreatedEvent {
    pub chat_id: Uuid,
    pub created_by: Uuid,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUpdatedEvent {
    pub chat_id: Uuid,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreatedEvent {
    pub chat_id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageUpdatedEvent {
    pub chat_id: Uuid,
    pub message_id: Uuid,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeletedEvent {
    pub chat_id: Uuid,
    pub message_id: Uuid,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub chat_id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteCreatedEvent {
    pub chat_id: Uuid,
    pub invite_id: Uuid,
    pub created_by: Uuid,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteDeletedEvent {
    pub chat_id: Uuid,
    pub invite_id: Uuid,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        let event = DomainEvent::MembershipChanged(MembershipChangedEvent {
            chat_id: Uuid::nil(),
            user_id: Uuid::nil(),
            change: MembershipChange::Joined,
            role: Some(ChatRole::Member),
            at: Utc::now(),
        });
        assert_eq!(event.event_type(), "MEMBERSHIP_CHANGED");
        assert_eq!(event.chat_id(), Uuid::nil());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = DomainEvent::InviteDeleted(InviteDeletedEvent {
            chat_id: Uuid::nil(),
            invite_id: Uuid::nil(),
            at: Utc::now(),
        });
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "INVITE_DELETED");
    }
}
