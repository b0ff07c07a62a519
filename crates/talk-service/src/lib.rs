//! # talk-service
//!
//! Application layer containing business logic, services, and DTOs. The
//! invite lifecycle engine in [`services::invite`] is the core of the
//! crate; the remaining services are the CRUD slice it lives beside.

pub mod dto;
pub mod services;

pub use services::{
    ChatPolicyService, ChatService, InviteService, MessageService, ReactionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
