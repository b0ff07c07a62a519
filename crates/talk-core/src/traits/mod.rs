//! Ports - traits the infrastructure layer implements

mod notifications;
mod repositories;

pub use notifications::{NotificationSink, NullNotificationSink};
pub use repositories::{
    ChatRepository, InviteLinkRepository, MemberRepository, MessageQuery, MessageRepository,
    ReactionRepository, RedeemOutcome, RepoResult, UserRepository,
};
