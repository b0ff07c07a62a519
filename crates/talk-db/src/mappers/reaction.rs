//! Reaction entity <-> model mapper

use talk_core::entities::{Reaction, ReactionCount, ReactionType};
use talk_core::error::DomainError;

use crate::models::{ReactionCountModel, ReactionModel};

fn reaction_type_from_rank(rank: i16) -> Result<ReactionType, DomainError> {
    ReactionType::from_rank(rank)
        .ok_or_else(|| DomainError::InternalError(format!("invalid reaction type rank: {rank}")))
}

/// Convert ReactionModel to Reaction entity
pub fn reaction_from_model(model: ReactionModel) -> Result<Reaction, DomainError> {
    Ok(Reaction {
        id: model.id,
        message_id: model.message_id,
        user_id: model.user_id,
        reaction_type: reaction_type_from_rank(model.reaction_type)?,
        created_at: model.created_at,
    })
}

/// Convert an aggregated count row to the domain type
pub fn reaction_count_from_model(model: ReactionCountModel) -> Result<ReactionCount, DomainError> {
    Ok(ReactionCount {
        reaction_type: reaction_type_from_rank(model.reaction_type)?,
        count: model.count,
    })
}
