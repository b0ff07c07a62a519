//! Entity <-> model mappers

mod chat;
mod invite_link;
mod member;
mod message;
mod reaction;
mod user;

pub use chat::chat_from_model;
pub use member::member_from_model;
pub use message::message_from_model;
pub use reaction::{reaction_count_from_model, reaction_from_model};
