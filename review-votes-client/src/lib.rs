//! # Review Votes Client
//!
//! Client-side half of the vote state machine. `ClientVoteController` applies
//! vote transitions optimistically, reconciles them with the server's answer
//! and rolls back on failure. `HttpVoteApi` is the transport it uses to reach
//! the vote resource.
pub mod api;
pub mod controller;
pub mod errors;

pub use api::{HttpVoteApi, VoteApi};
pub use controller::{ClientVoteController, ControllerConfig, ReviewVoteState, VoteAttempt, VoteNotice};
pub use errors::ClientError;
