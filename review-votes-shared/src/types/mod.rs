mod identity;
mod outcome;
mod vote;
mod vote_direction;
mod votes_count;
mod wire;

pub use identity::{CallerIdentity, DisplayIdentity};
pub use outcome::{CastOutcome, RemoveOutcome, VoteAction};
pub use vote::Vote;
pub use vote_direction::{InvalidVoteDirection, VoteDirection, VoteTransition};
pub use votes_count::VoteTally;
pub use wire::{
    CastVoteRequest, CastVoteResponse, ErrorResponse, RemoveVoteRequest, RemoveVoteResponse,
    VoteCountsResponse, VotesResponse,
};
