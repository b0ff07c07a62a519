//! Chat entity - a direct or group conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum ChatType {
    Direct = 0,
    #[default]
    Group = 1,
}

impl ChatType {
    pub const fn rank(self) -> i16 {
        self as i16
    }

    pub const fn from_rank(rank: i16) -> Option<Self> {
        match rank {
            0 => Some(Self::Direct),
            1 => Some(Self::Group),
            _ => None,
        }
    }
}

/// Invite policy settings read by the invite lifecycle engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InviteSettings {
    /// Whether invite links may exist for this chat at all
    pub allow_invites: bool,
    /// Whether ordinary members (not just admins) may create links
    pub allow_members_to_invite: bool,
}

/// Chat entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub chat_type: ChatType,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub allow_invites: bool,
    pub allow_members_to_invite: bool,
    pub max_members: Option<i32>,
}

impl Chat {
    /// Create a new Chat with open invite settings
    pub fn new(name: String, chat_type: ChatType, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            avatar_url: None,
            chat_type,
            created_by,
            created_at: now,
            last_activity_at: now,
            allow_invites: true,
            allow_members_to_invite: true,
            max_members: None,
        }
    }

    /// Invite policy snapshot for this chat
    pub fn invite_settings(&self) -> InviteSettings {
        InviteSettings {
            allow_invites: self.allow_invites,
            allow_members_to_invite: self.allow_members_to_invite,
        }
    }

    /// Bump the activity timestamp
    pub fn touch_activity(&mut self) {
        self.last_activity_at = Utc::now();
    }
}
