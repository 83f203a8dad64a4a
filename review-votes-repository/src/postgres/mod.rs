//! PostgreSQL implementation of the votes repository.
//!
//! ## Database Tables
//!
//! - `review_votes`: one row per `(review_id, caller_identity)`, guarded by a unique index
mod votes_repository;

pub use votes_repository::PostgresVotesRepository;
