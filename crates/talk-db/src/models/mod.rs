//! Database models - SQLx-compatible structs for PostgreSQL tables

mod chat;
mod invite_link;
mod member;
mod message;
mod reaction;
mod user;

pub use chat::ChatModel;
pub use invite_link::InviteLinkModel;
pub use member::ChatMemberModel;
pub use message::MessageModel;
pub use reaction::{ReactionCountModel, ReactionModel};
pub use user::UserModel;
