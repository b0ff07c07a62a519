//! Domain events

mod domain_event;

pub use domain_event::{
    ChatCreatedEvent, ChatUpdatedEvent, DomainEvent, InviteCreatedEvent, InviteDeletedEvent,
    MembershipChange, MembershipChangedEvent, MessageCreatedEvent, MessageDeletedEvent,
    MessageUpdatedEvent, ReactionEvent,
};
