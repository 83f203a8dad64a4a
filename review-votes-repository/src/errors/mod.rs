//! Error types for the votes repository.
//! Consolidates and re-exports error types related to vote persistence.
mod votes;

pub use votes::VotesRepositoryError;
