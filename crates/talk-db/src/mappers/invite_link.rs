//! Invite link entity <-> model mapper

use talk_core::entities::InviteLink;

use crate::models::InviteLinkModel;

impl From<InviteLinkModel> for InviteLink {
    fn from(model: InviteLinkModel) -> Self {
        InviteLink {
            id: model.id,
            chat_id: model.chat_id,
            created_by: model.created_by,
            code: model.code,
            expires_at: model.expires_at,
            usage_limit: model.usage_limit,
            used_count: model.used_count,
            is_active: model.is_active,
            is_suspended: model.is_suspended,
            suspended_by: model.suspended_by,
            suspended_at: model.suspended_at,
            suspension_reason: model.suspension_reason,
            is_blocked: model.is_blocked,
            created_at: model.created_at,
        }
    }
}
