//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use talk_core::error::DomainError;
use uuid::Uuid;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Check for Postgres serialization/deadlock failures (SQLSTATE 40001/40P01)
///
/// These indicate a lost race with a concurrent transaction; callers map
/// them to the retryable `RedemptionRace`.
pub fn is_serialization_failure(e: &SqlxError) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == "40001" || code == "40P01")
}

/// Map a transactional redemption error: races become retryable
pub fn map_redeem_error(e: SqlxError) -> DomainError {
    if is_serialization_failure(&e) {
        DomainError::RedemptionRace
    } else {
        DomainError::DatabaseError(e.to_string())
    }
}

/// Create a "user not found" error
pub fn user_not_found(id: Uuid) -> DomainError {
    DomainError::UserNotFound(id)
}

/// Create a "chat not found" error
pub fn chat_not_found(id: Uuid) -> DomainError {
    DomainError::ChatNotFound(id)
}

/// Create a "member not found" error
pub fn member_not_found() -> DomainError {
    DomainError::MemberNotFound
}

/// Create a "message not found" error
pub fn message_not_found(id: Uuid) -> DomainError {
    DomainError::MessageNotFound(id)
}

/// Create an "invite not found" error keyed by id
pub fn invite_not_found(id: Uuid) -> DomainError {
    DomainError::InviteNotFound(id.to_string())
}

/// Create an "invite not found" error keyed by code
pub fn invite_not_found_by_code(code: &str) -> DomainError {
    DomainError::InviteNotFound(code.to_string())
}
