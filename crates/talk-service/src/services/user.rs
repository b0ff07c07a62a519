//! User service

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{UpdateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a user's public profile
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id.to_string()))?;

        Ok(UserResponse::from(&user))
    }

    /// Update the caller's own profile
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        request.validate()?;

        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        if let Some(username) = request.username {
            user.username = username;
        }
        if let Some(display_name) = request.display_name {
            user.display_name = Some(display_name);
        }
        if let Some(avatar_url) = request.avatar_url {
            user.avatar_url = Some(avatar_url);
        }

        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, "Profile updated");

        Ok(UserResponse::from(&user))
    }

    /// Record presence activity for a user
    #[instrument(skip(self))]
    pub async fn touch_presence(&self, user_id: Uuid, online: bool) -> ServiceResult<()> {
        self.ctx
            .user_repo()
            .touch_presence(user_id, online)
            .await
            .map_err(ServiceError::from)
    }
}
