//! Domain entities - core business objects

mod chat;
mod invite_link;
mod member;
mod message;
mod reaction;
mod user;

pub use chat::{Chat, ChatType, InviteSettings};
pub use invite_link::InviteLink;
pub use member::ChatMember;
pub use message::{Message, MessageType};
pub use reaction::{Reaction, ReactionCount, ReactionType};
pub use user::User;
