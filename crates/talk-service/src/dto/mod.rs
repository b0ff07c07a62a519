//! Data transfer objects for service requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for service inputs
//! - Response DTOs for serializing service outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    AddReactionRequest, CreateChatRequest, CreateInviteLinkRequest, CreateMessageRequest,
    SuspendInviteLinkRequest, UpdateChatRequest, UpdateInviteLinkRequest, UpdateMemberRoleRequest,
    UpdateMessageRequest, UpdateUserRequest,
};

// Re-export commonly used response types
pub use responses::{
    ChatMemberResponse, ChatResponse, ChatSummaryResponse, InviteLinkInfoResponse,
    InviteLinkResponse, MessageResponse, ReactionCountResponse, ReactionResponse, UserResponse,
};

// Re-export mappers and helper structs
pub use mappers::{ChatWithCounts, ChatWithMembers, InviteLinkWithDetails};
