//! # talk-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `talk-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations, including the transactional invite
//!   redemption path
//!
//! ## Usage
//!
//! ```rust,ignore
//! use talk_db::pool::{create_pool, DatabaseConfig};
//! use talk_db::repositories::PgInviteLinkRepository;
//! use talk_core::traits::InviteLinkRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let invite_repo = PgInviteLinkRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgChatRepository, PgInviteLinkRepository, PgMemberRepository, PgMessageRepository,
    PgReactionRepository, PgUserRepository,
};
