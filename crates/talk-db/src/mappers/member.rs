//! Chat member entity <-> model mapper

use talk_core::entities::ChatMember;
use talk_core::error::DomainError;
use talk_core::value_objects::ChatRole;

use crate::models::ChatMemberModel;

/// Convert ChatMemberModel to ChatMember entity
///
/// Fails on an unknown role rank, which would mean corrupt data.
pub fn member_from_model(model: ChatMemberModel) -> Result<ChatMember, DomainError> {
    let role = ChatRole::try_from(model.role)
        .map_err(|e| DomainError::InternalError(e.to_string()))?;

    Ok(ChatMember {
        id: model.id,
        chat_id: model.chat_id,
        user_id: model.user_id,
        role,
        joined_at: model.joined_at,
        last_read_at: model.last_read_at,
    })
}
