//! JSON bodies exchanged on the vote resource.
//!
//! Request fields are optional on purpose: a missing field is a validation
//! error reported by the service, not a deserialization failure.
use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::types::{VoteAction, VoteDirection, VoteTally};

/// Body of a cast (or toggle) request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastVoteRequest {
    pub review_id: Option<String>,
    pub vote_type: Option<String>,
}

/// Body of an explicit removal request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoveVoteRequest {
    pub review_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastVoteResponse {
    pub success: bool,
    pub action: VoteAction,
    /// Direction held after the request; `null` once the vote was toggled off.
    pub vote_type: Option<VoteDirection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoveVoteResponse {
    pub success: bool,
    pub action: VoteAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotesResponse {
    pub success: bool,
    pub votes: HashMap<Uuid, VoteDirection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteCountsResponse {
    pub success: bool,
    pub counts: HashMap<Uuid, VoteTally>,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
