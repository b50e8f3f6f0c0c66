//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use tube_core::engagement::{TargetKind, TargetRef};
use tube_core::error::DomainError;
use tube_core::value_objects::Snowflake;

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
    map_db_error(e)
}

/// Check for a foreign key violation (the parent row is gone)
pub fn map_foreign_key_violation<F>(e: SqlxError, on_missing: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_missing();
        }
    }
    map_db_error(e)
}

/// Map a failed reaction insert: a unique violation is a lost race, a
/// foreign key violation means the target disappeared underneath us.
pub fn map_reaction_insert_error(e: SqlxError, actor: Snowflake, target: TargetRef) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return DomainError::ReactionConflict { actor, target };
        }
        if db_err.is_foreign_key_violation() {
            return DomainError::TargetNotFound(target);
        }
    }
    map_db_error(e)
}

pub fn user_not_found(id: Snowflake) -> DomainError {
    DomainError::UserNotFound(id)
}

pub fn video_not_found(id: Snowflake) -> DomainError {
    DomainError::VideoNotFound(id)
}

pub fn comment_not_found(id: Snowflake) -> DomainError {
    DomainError::CommentNotFound(id)
}

pub fn target_not_found(target: TargetRef) -> DomainError {
    DomainError::TargetNotFound(target)
}

/// Table holding the counters for a target kind
pub fn target_table(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Video => "videos",
        TargetKind::Comment => "comments",
    }
}

/// Column in `reactions` that references a target kind
pub fn reaction_column(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Video => "video_id",
        TargetKind::Comment => "comment_id",
    }
}
