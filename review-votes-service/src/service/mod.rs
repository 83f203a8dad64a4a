//! The server-side vote state machine and the request parsing it relies on.
mod vote_service;

pub use vote_service::{parse_direction, parse_review_id, parse_review_ids, VoteService};
