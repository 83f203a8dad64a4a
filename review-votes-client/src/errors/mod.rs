//! Error types for the vote client.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the vote API.
///
/// None of these are fatal to a controller: every one of them is turned into
/// a rollback plus a user-visible notice.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection refused, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The server answered 2xx but reported `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
