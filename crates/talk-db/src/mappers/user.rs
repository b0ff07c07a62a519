//! User entity <-> model mapper

use talk_core::entities::User;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            username: model.username,
            email: model.email,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            created_at: model.created_at,
            last_seen_at: model.last_seen_at,
            is_online: model.is_online,
        }
    }
}
