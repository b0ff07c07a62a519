//! ChatMember entity - a user's membership in a chat

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::ChatRole;

/// Chat membership entity (junction between User and Chat)
///
/// At most one record may exist per (chat_id, user_id) pair; the store
/// enforces this with a unique index independently of any caller checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMember {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub role: ChatRole,
    pub joined_at: DateTime<Utc>,
    pub last_read_at: Option<DateTime<Utc>>,
}

impl ChatMember {
    /// Create a new ChatMember
    pub fn new(chat_id: Uuid, user_id: Uuid, role: ChatRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            user_id,
            role,
            joined_at: Utc::now(),
            last_read_at: None,
        }
    }

    /// Check whether the member holds at least the given role
    #[inline]
    pub fn has_role(&self, minimum: ChatRole) -> bool {
        self.role.at_least(minimum)
    }

    /// Update the read marker to now
    pub fn mark_read(&mut self) {
        self.last_read_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_creation() {
        let chat_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let member = ChatMember::new(chat_id, user_id, ChatRole::Member);
        assert_eq!(member.chat_id, chat_id);
        assert_eq!(member.user_id, user_id);
        assert_eq!(member.role, ChatRole::Member);
        assert!(member.last_read_at.is_none());
    }

    #[test]
    fn test_role_gate() {
        let owner = ChatMember::new(Uuid::new_v4(), Uuid::new_v4(), ChatRole::Owner);
        assert!(owner.has_role(ChatRole::Member));
        assert!(owner.has_role(ChatRole::Owner));

        let member = ChatMember::new(Uuid::new_v4(), Uuid::new_v4(), ChatRole::Member);
        assert!(!member.has_role(ChatRole::Admin));
    }

    #[test]
    fn test_mark_read() {
        let mut member = ChatMember::new(Uuid::new_v4(), Uuid::new_v4(), ChatRole::Member);
        member.mark_read();
        assert!(member.last_read_at.is_some());
    }
}
