//! Error types for the vote service.
//! Defines the taxonomy surfaced to callers of the vote state machine.
mod service;

pub use service::VoteServiceError;
