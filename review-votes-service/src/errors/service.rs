use review_votes_repository::VotesRepositoryError;
use thiserror::Error;

/// Represents errors surfaced by the vote service.
///
/// Uniqueness conflicts raised by the repository are recovered internally and
/// only reach this type once the retry budget is exhausted.
#[derive(Debug, Error)]
pub enum VoteServiceError {
    /// Malformed or missing input; always fixable by the client.
    #[error("{0}")]
    Validation(String),

    /// The caller identity could not be resolved.
    #[error("Authentication required")]
    AuthRequired,

    /// The persistence layer failed.
    #[error("Store error: {0}")]
    Store(#[from] VotesRepositoryError),
}

impl VoteServiceError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
