//! Chat roles - per-chat authority levels with an explicit total order
//!
//! Role gates throughout the system compare `role >= minimum`, so the
//! ordering is part of the contract: Member < Admin < Owner. The numeric
//! ranks are fixed and stored as-is in the database.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user's role within a single chat
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum ChatRole {
    /// Ordinary participant (rank 0)
    #[default]
    Member = 0,
    /// Can moderate invites and chat settings (rank 1)
    Admin = 1,
    /// Chat creator-level authority (rank 2)
    Owner = 2,
}

impl ChatRole {
    /// Numeric rank used for persistence and comparison
    #[inline]
    pub const fn rank(self) -> i16 {
        self as i16
    }

    /// Reconstruct a role from its stored rank
    pub const fn from_rank(rank: i16) -> Option<Self> {
        match rank {
            0 => Some(Self::Member),
            1 => Some(Self::Admin),
            2 => Some(Self::Owner),
            _ => None,
        }
    }

    /// Check whether this role meets a minimum requirement
    #[inline]
    pub fn at_least(self, minimum: ChatRole) -> bool {
        self >= minimum
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Admin => write!(f, "admin"),
            Self::Owner => write!(f, "owner"),
        }
    }
}

/// Error when converting a stored rank back to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid chat role rank: {0}")]
pub struct RoleParseError(pub i16);

impl TryFrom<i16> for ChatRole {
    type Error = RoleParseError;

    fn try_from(rank: i16) -> Result<Self, Self::Error> {
        Self::from_rank(rank).ok_or(RoleParseError(rank))
    }
}

impl From<ChatRole> for i16 {
    fn from(role: ChatRole) -> Self {
        role.rank()
    }
}
