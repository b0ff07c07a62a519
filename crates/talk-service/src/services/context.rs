//! Service context - dependency container for services
//!
//! Holds the repository ports, the notification sink, the invite code
//! generator, and the invite policy configuration needed by services.

use std::sync::Arc;

use talk_common::InviteConfig;
use talk_core::traits::{
    ChatRepository, InviteLinkRepository, MemberRepository, MessageRepository, NotificationSink,
    ReactionRepository, UserRepository,
};
use talk_core::InviteCodeGenerator;
use talk_db::PgPool;
use talk_db::{
    PgChatRepository, PgInviteLinkRepository, PgMemberRepository, PgMessageRepository,
    PgReactionRepository, PgUserRepository,
};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repository ports (persistence)
/// - The notification sink (fire-and-forget event delivery)
/// - The invite code generator (injected RNG)
/// - Invite policy configuration
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    member_repo: Arc<dyn MemberRepository>,
    message_repo: Arc<dyn MessageRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    invite_repo: Arc<dyn InviteLinkRepository>,

    // Collaborators
    notifier: Arc<dyn NotificationSink>,
    code_generator: Arc<InviteCodeGenerator>,

    // Configuration
    invite_config: InviteConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        chat_repo: Arc<dyn ChatRepository>,
        member_repo: Arc<dyn MemberRepository>,
        message_repo: Arc<dyn MessageRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        invite_repo: Arc<dyn InviteLinkRepository>,
        notifier: Arc<dyn NotificationSink>,
        code_generator: Arc<InviteCodeGenerator>,
        invite_config: InviteConfig,
    ) -> Self {
        Self {
            user_repo,
            chat_repo,
            member_repo,
            message_repo,
            reaction_repo,
            invite_repo,
            notifier,
            code_generator,
            invite_config,
        }
    }

    /// Wire a context against PostgreSQL repositories sharing one pool
    pub fn postgres(
        pool: PgPool,
        notifier: Arc<dyn NotificationSink>,
        code_generator: Arc<InviteCodeGenerator>,
        invite_config: InviteConfig,
    ) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgChatRepository::new(pool.clone())),
            Arc::new(PgMemberRepository::new(pool.clone())),
            Arc::new(PgMessageRepository::new(pool.clone())),
            Arc::new(PgReactionRepository::new(pool.clone())),
            Arc::new(PgInviteLinkRepository::new(pool)),
            notifier,
            code_generator,
            invite_config,
        )
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the chat repository
    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the invite link repository
    pub fn invite_repo(&self) -> &dyn InviteLinkRepository {
        self.invite_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the notification sink
    pub fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    /// Get the invite code generator
    pub fn code_generator(&self) -> &InviteCodeGenerator {
        self.code_generator.as_ref()
    }

    // === Configuration ===

    /// Get the invite policy configuration
    pub fn invite_config(&self) -> &InviteConfig {
        &self.invite_config
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("invite_config", &self.invite_config)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    chat_repo: Option<Arc<dyn ChatRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    invite_repo: Option<Arc<dyn InviteLinkRepository>>,
    notifier: Option<Arc<dyn NotificationSink>>,
    code_generator: Option<Arc<InviteCodeGenerator>>,
    invite_config: Option<InviteConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn invite_repo(mut self, repo: Arc<dyn InviteLinkRepository>) -> Self {
        self.invite_repo = Some(repo);
        self
    }

    pub fn notifier(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(sink);
        self
    }

    pub fn code_generator(mut self, generator: Arc<InviteCodeGenerator>) -> Self {
        self.code_generator = Some(generator);
        self
    }

    pub fn invite_config(mut self, config: InviteConfig) -> Self {
        self.invite_config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.chat_repo
                .ok_or_else(|| ServiceError::validation("chat_repo is required"))?,
            self.member_repo
                .ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.invite_repo
                .ok_or_else(|| ServiceError::validation("invite_repo is required"))?,
            self.notifier
                .ok_or_else(|| ServiceError::validation("notifier is required"))?,
            self.code_generator
                .ok_or_else(|| ServiceError::validation("code_generator is required"))?,
            self.invite_config.unwrap_or_default(),
        ))
    }
}
