//! Error types for the votes repository.
//! Defines specific errors that can occur during database operations related to votes.
use thiserror::Error;
use uuid::Uuid;

/// Represents errors that can occur within the votes repository.
///
/// `Conflict` is the only variant callers are expected to recover from: it
/// signals that a concurrent request inserted the same `(review, caller)` vote
/// first.
#[derive(Debug, Error)]
pub enum VotesRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Vote already exists for review {review_id} and caller {caller_identity}")]
    Conflict {
        review_id: Uuid,
        caller_identity: String,
    },

    #[error("Vote not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(i16),

    #[error("Invalid caller identity stored for vote {0}")]
    InvalidCallerIdentity(Uuid),
}
