//! Message entity <-> model mapper

use talk_core::entities::{Message, MessageType};
use talk_core::error::DomainError;

use crate::models::MessageModel;

/// Convert MessageModel to Message entity
pub fn message_from_model(model: MessageModel) -> Result<Message, DomainError> {
    let message_type = MessageType::from_rank(model.message_type).ok_or_else(|| {
        DomainError::InternalError(format!("invalid message type rank: {}", model.message_type))
    })?;

    Ok(Message {
        id: model.id,
        chat_id: model.chat_id,
        user_id: model.user_id,
        content: model.content,
        message_type,
        file_url: model.file_url,
        file_name: model.file_name,
        file_size: model.file_size,
        mime_type: model.mime_type,
        created_at: model.created_at,
        edited_at: model.edited_at,
        is_deleted: model.is_deleted,
    })
}
