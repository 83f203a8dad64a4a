//! # Review Votes Service
//! This crate implements the server-side vote state machine. Given a caller
//! identity, a review and a requested direction, it decides whether to create,
//! update or delete the caller's vote and applies that decision against a
//! `VotesRepository`.
//! It also provides the anonymous display identity collaborator and the
//! service error taxonomy.
pub mod errors;
pub mod identity;
pub mod service;

pub use errors::VoteServiceError;
pub use identity::{DisplayIdentityGenerator, RotatingDisplayIdentity};
pub use service::VoteService;
