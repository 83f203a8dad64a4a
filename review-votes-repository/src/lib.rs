//! # Review Votes Repository
//! This crate provides the persistence boundary for review votes. It includes
//! the repository trait, its error type, a PostgreSQL implementation backed by
//! a unique index on `(review_id, caller_identity)`, and an in-memory
//! implementation enforcing the same constraint.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::VotesRepositoryError;
pub use interfaces::VotesRepository;
pub use memory::InMemoryVotesRepository;
pub use postgres::PostgresVotesRepository;
