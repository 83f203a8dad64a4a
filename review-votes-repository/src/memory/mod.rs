//! In-memory implementation of the votes repository.
//!
//! Mirrors the PostgreSQL uniqueness constraint so the service behaves the same
//! against either backend. Used by tests and by local development runs.
mod votes_repository;

pub use votes_repository::InMemoryVotesRepository;
