//! PostgreSQL repository implementations

mod chat;
mod error;
mod invite_link;
mod member;
mod message;
mod reaction;
mod user;

pub use chat::PgChatRepository;
pub use invite_link::PgInviteLinkRepository;
pub use member::PgMemberRepository;
pub use message::PgMessageRepository;
pub use reaction::PgReactionRepository;
pub use user::PgUserRepository;
