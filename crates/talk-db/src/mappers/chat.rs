//! Chat entity <-> model mapper

use talk_core::entities::{Chat, ChatType};
use talk_core::error::DomainError;

use crate::models::ChatModel;

/// Convert ChatModel to Chat entity
///
/// Fails on an unknown chat_type rank, which would mean corrupt data.
pub fn chat_from_model(model: ChatModel) -> Result<Chat, DomainError> {
    let chat_type = ChatType::from_rank(model.chat_type)
        .ok_or_else(|| DomainError::InternalError(format!("invalid chat type rank: {}", model.chat_type)))?;

    Ok(Chat {
        id: model.id,
        name: model.name,
        description: model.description,
        avatar_url: model.avatar_url,
        chat_type,
        created_by: model.created_by,
        created_at: model.created_at,
        last_activity_at: model.last_activity_at,
        allow_invites: model.allow_invites,
        allow_members_to_invite: model.allow_members_to_invite,
        max_members: model.max_members,
    })
}
