//! # talk-core
//!
//! Domain layer containing entities, value objects, repository traits, and
//! domain events. This crate has zero dependencies on infrastructure
//! (database, transport, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Chat, ChatMember, ChatType, InviteLink, InviteSettings, Message, MessageType, Reaction,
    ReactionCount, ReactionType, User,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    ChatRepository, InviteLinkRepository, MemberRepository, MessageQuery, MessageRepository,
    NotificationSink, NullNotificationSink, ReactionRepository, RedeemOutcome, RepoResult,
    UserRepository,
};
pub use value_objects::{ChatRole, InviteCodeGenerator, RoleParseError, CODE_ALPHABET, CODE_LENGTH};
