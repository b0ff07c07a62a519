//! Reaction entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed reaction palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum ReactionType {
    Like = 0,
    Love = 1,
    Laugh = 2,
    Sad = 3,
    Angry = 4,
    Wow = 5,
}

impl ReactionType {
    pub const fn rank(self) -> i16 {
        self as i16
    }

    pub const fn from_rank(rank: i16) -> Option<Self> {
        match rank {
            0 => Some(Self::Like),
            1 => Some(Self::Love),
            2 => Some(Self::Laugh),
            3 => Some(Self::Sad),
            4 => Some(Self::Angry),
            5 => Some(Self::Wow),
            _ => None,
        }
    }
}

/// Reaction entity - one user's reaction of one type on one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(message_id: Uuid, user_id: Uuid, reaction_type: ReactionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            message_id,
            user_id,
            reaction_type,
            created_at: Utc::now(),
        }
    }
}

/// Aggregated per-type reaction count for a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub reaction_type: ReactionType,
    pub count: i64,
}
