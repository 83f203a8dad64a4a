// HTTP request handlers for the vote resource
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use review_votes_service::service::parse_review_ids;
use review_votes_shared::types::{
    CastVoteRequest, CastVoteResponse, RemoveVoteRequest, RemoveVoteResponse, VoteCountsResponse,
    VotesResponse,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::server::state::AppState;

/// Query string of the batch lookups.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewIdsQuery {
    pub review_ids: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Review votes API is running")
}

/// `POST /api/votes`: cast, toggle or switch the caller's vote.
pub async fn cast_vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CastVoteRequest>, JsonRejection>,
) -> Result<Json<CastVoteResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    let caller_identity = state.identity_resolver.resolve(&headers);

    let outcome = state
        .vote_service
        .cast_or_toggle(caller_identity.as_ref(), &request)
        .await?;

    Ok(Json(CastVoteResponse {
        success: true,
        action: outcome.action,
        vote_type: outcome.direction,
    }))
}

/// `DELETE /api/votes`: remove the caller's vote.
pub async fn remove_vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RemoveVoteRequest>, JsonRejection>,
) -> Result<Json<RemoveVoteResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    let caller_identity = state.identity_resolver.resolve(&headers);

    let outcome = state
        .vote_service
        .remove(caller_identity.as_ref(), &request)
        .await?;

    Ok(Json(RemoveVoteResponse {
        success: true,
        action: outcome.action,
    }))
}

/// `GET /api/votes?review_ids=a,b`: the caller's direction per review.
///
/// Anonymous callers get an empty map rather than a 401.
pub async fn get_votes(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ReviewIdsQuery>, QueryRejection>,
) -> Result<Json<VotesResponse>, ApiError> {
    let Query(query) = query.map_err(reject_query)?;
    let review_ids = parse_review_ids(query.review_ids.as_deref())?;
    let caller_identity = state.identity_resolver.resolve(&headers);

    let votes = state
        .vote_service
        .batch_get_votes(caller_identity.as_ref(), &review_ids)
        .await?;
    debug!(requested = review_ids.len(), found = votes.len(), "Votes looked up");

    Ok(Json(VotesResponse { success: true, votes }))
}

/// `GET /api/votes/counts?review_ids=a,b`: helpful/unhelpful tallies per review.
pub async fn get_vote_counts(
    State(state): State<AppState>,
    query: Result<Query<ReviewIdsQuery>, QueryRejection>,
) -> Result<Json<VoteCountsResponse>, ApiError> {
    let Query(query) = query.map_err(reject_query)?;
    let review_ids = parse_review_ids(query.review_ids.as_deref())?;

    let counts = state.vote_service.batch_get_counts(&review_ids).await?;
    Ok(Json(VoteCountsResponse { success: true, counts }))
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    warn!(error = %rejection.body_text(), "Rejected request body");
    ApiError::Validation("Invalid JSON body".to_string())
}

fn reject_query(rejection: QueryRejection) -> ApiError {
    warn!(error = %rejection.body_text(), "Rejected query string");
    ApiError::Validation("Invalid query string".to_string())
}
