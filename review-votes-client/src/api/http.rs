use std::collections::HashMap;

use async_trait::async_trait;
use review_votes_shared::types::{
    CallerIdentity, CastOutcome, CastVoteRequest, CastVoteResponse, ErrorResponse, RemoveOutcome,
    RemoveVoteRequest, RemoveVoteResponse, VoteCountsResponse, VoteDirection, VoteTally,
    VotesResponse,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::api::VoteApi;
use crate::errors::ClientError;

/// Default header carrying the caller identity, matching the server default.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-caller-identity";

/// `VoteApi` over the JSON vote resource.
///
/// The caller identity is sent on every request in `identity_header`; without
/// one, the server treats the client as unauthenticated.
#[derive(Clone)]
pub struct HttpVoteApi {
    client: reqwest::Client,
    votes_url: String,
    identity_header: String,
    caller_identity: Option<CallerIdentity>,
}

impl HttpVoteApi {
    /// Creates a new transport.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Server origin, e.g. `http://127.0.0.1:8080`
    /// * `caller_identity` - Identity to present, `None` for anonymous viewers
    pub fn new(base_url: &str, caller_identity: Option<CallerIdentity>) -> Self {
        Self {
            client: reqwest::Client::new(),
            votes_url: format!("{}/api/votes", base_url.trim_end_matches('/')),
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            caller_identity,
        }
    }

    /// Overrides the header the caller identity travels in.
    pub fn with_identity_header(mut self, identity_header: impl Into<String>) -> Self {
        self.identity_header = identity_header.into();
        self
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.caller_identity {
            Some(caller_identity) => request.header(self.identity_header.as_str(), caller_identity.as_str()),
            None => request,
        }
    }

    fn join_ids(review_ids: &[Uuid]) -> String {
        review_ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Sends a request and decodes a successful body.
    ///
    /// Non-2xx statuses and `success: false` bodies both become errors.
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        if body.get("success").and_then(Value::as_bool) != Some(true) {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("success flag missing")
                .to_string();
            return Err(ClientError::Rejected(message));
        }

        serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl VoteApi for HttpVoteApi {
    async fn cast_vote(&self, review_id: Uuid, direction: VoteDirection) -> Result<CastOutcome, ClientError> {
        debug!(review_id = %review_id, direction = %direction, "Casting vote");
        let body = CastVoteRequest {
            review_id: Some(review_id.to_string()),
            vote_type: Some(direction.to_string()),
        };
        let response: CastVoteResponse = self.send(self.client.post(&self.votes_url).json(&body)).await?;
        Ok(CastOutcome {
            action: response.action,
            direction: response.vote_type,
        })
    }

    async fn remove_vote(&self, review_id: Uuid) -> Result<RemoveOutcome, ClientError> {
        debug!(review_id = %review_id, "Removing vote");
        let body = RemoveVoteRequest {
            review_id: Some(review_id.to_string()),
        };
        let response: RemoveVoteResponse = self.send(self.client.delete(&self.votes_url).json(&body)).await?;
        Ok(RemoveOutcome {
            action: response.action,
        })
    }

    async fn fetch_votes(&self, review_ids: &[Uuid]) -> Result<HashMap<Uuid, VoteDirection>, ClientError> {
        if review_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let request = self
            .client
            .get(&self.votes_url)
            .query(&[("review_ids", Self::join_ids(review_ids))]);
        let response: VotesResponse = self.send(request).await?;
        Ok(response.votes)
    }

    async fn fetch_counts(&self, review_ids: &[Uuid]) -> Result<HashMap<Uuid, VoteTally>, ClientError> {
        if review_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let request = self
            .client
            .get(format!("{}/counts", self.votes_url))
            .query(&[("review_ids", Self::join_ids(review_ids))]);
        let response: VoteCountsResponse = self.send(request).await?;
        Ok(response.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_votes_url_ignores_trailing_slash() {
        let api = HttpVoteApi::new("http://localhost:8080/", None);
        assert_eq!(api.votes_url, "http://localhost:8080/api/votes");
    }

    #[test]
    fn test_join_ids_is_comma_separated() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(HttpVoteApi::join_ids(&[a, b]), format!("{a},{b}"));
    }
}
