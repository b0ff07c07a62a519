//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub reaction_type: i16,
    pub created_at: DateTime<Utc>,
}

/// Aggregated per-type count row
#[derive(Debug, Clone, FromRow)]
pub struct ReactionCountModel {
    pub reaction_type: i16,
    pub count: i64,
}
