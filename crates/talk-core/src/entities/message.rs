//! Message entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum MessageType {
    #[default]
    Text = 0,
    Image = 1,
    Voice = 2,
    File = 3,
    System = 4,
}

impl MessageType {
    pub const fn rank(self) -> i16 {
        self as i16
    }

    pub const fn from_rank(rank: i16) -> Option<Self> {
        match rank {
            0 => Some(Self::Text),
            1 => Some(Self::Image),
            2 => Some(Self::Voice),
            3 => Some(Self::File),
            4 => Some(Self::System),
            _ => None,
        }
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub message_type: MessageType,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl Message {
    /// Maximum content length in characters
    pub const MAX_CONTENT_LENGTH: usize = 4000;

    /// Create a new text message
    pub fn new(chat_id: Uuid, user_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            user_id,
            content,
            message_type: MessageType::Text,
            file_url: None,
            file_name: None,
            file_size: None,
            mime_type: None,
            created_at: Utc::now(),
            edited_at: None,
            is_deleted: false,
        }
    }

    /// Replace the content and stamp the edit time
    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.edited_at = Some(Utc::now());
    }

    /// Check if this message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::new(Uuid::new_v4(), Uuid::new_v4(), "hello".to_string());
        assert_eq!(msg.message_type, MessageType::Text);
        assert!(!msg.is_edited());
        assert!(!msg.is_deleted);
    }

    #[test]
    fn test_edit_stamps_timestamp() {
        let mut msg = Message::new(Uuid::new_v4(), Uuid::new_v4(), "helo".to_string());
        msg.edit("hello".to_string());
        assert_eq!(msg.content, "hello");
        assert!(msg.is_edited());
    }

    #[test]
    fn test_message_type_round_trip() {
        for kind in [
            MessageType::Text,
            MessageType::Image,
            MessageType::Voice,
            MessageType::File,
            MessageType::System,
        ] {
            assert_eq!(MessageType::from_rank(kind.rank()), Some(kind));
        }
        assert_eq!(MessageType::from_rank(9), None);
    }
}
