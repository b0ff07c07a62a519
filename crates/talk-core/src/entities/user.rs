//! User entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User entity
///
/// Credential storage lives outside this domain; the entity carries only
/// profile and presence fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub is_online: bool,
}

impl User {
    /// Create a new User
    pub fn new(username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            display_name: None,
            avatar_url: None,
            created_at: now,
            last_seen_at: now,
            is_online: false,
        }
    }

    /// Name shown to other users (display name if set, otherwise username)
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Record activity from this user
    pub fn touch_presence(&mut self, online: bool) {
        self.last_seen_at = Utc::now();
        self.is_online = online;
    }
}
