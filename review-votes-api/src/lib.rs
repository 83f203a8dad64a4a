//! Review Votes API Library
//!
//! This library provides the HTTP surface of the review votes system,
//! including configuration management, error handling, dependency wiring and
//! the axum router serving the vote resource.

pub mod config;
pub mod errors;
pub mod server;

pub use config::{ApiConfig, Dependencies, StoreBackend};
pub use errors::{ApiError, ConfigError, ServerError};
