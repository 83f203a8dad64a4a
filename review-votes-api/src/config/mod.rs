//! Configuration module for the Review Votes API.
//! Reads settings from the environment and wires up the application dependencies.
mod dependencies;

pub use dependencies::Dependencies;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::http::{HeaderName, HeaderValue, Method, header};
use review_votes_service::identity::DEFAULT_ROTATION_SECS;
use tower_http::cors::CorsLayer;

use crate::errors::ConfigError;

pub const DEFAULT_SERVER_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_IDENTITY_HEADER: &str = "x-caller-identity";

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is unset.
const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Where votes are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    /// Process-local store; votes are lost on restart.
    Memory,
}

/// Settings for one API process.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub server_addr: SocketAddr,
    pub store: StoreBackend,
    /// Request header carrying the authenticated caller identity.
    pub identity_header: HeaderName,
    pub display_identity_rotation_secs: i64,
    pub cors_allowed_origins: Vec<HeaderValue>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::new(DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT),
            store: StoreBackend::Memory,
            identity_header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
            display_identity_rotation_secs: DEFAULT_ROTATION_SECS,
            cors_allowed_origins: DEFAULT_CORS_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect(),
        }
    }
}

impl ApiConfig {
    /// Loads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Missing` - `DATABASE_URL` is unset while the postgres store is selected.
    /// * `ConfigError::Invalid` - A variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store = match var("VOTE_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres {
                database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(invalid("VOTE_STORE", other)),
        };

        let host = match var("SERVER_HOST") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|_| invalid("SERVER_HOST", &raw))?,
            None => defaults.server_addr.ip(),
        };
        let port = match var("SERVER_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| invalid("SERVER_PORT", &raw))?,
            None => defaults.server_addr.port(),
        };

        let identity_header = match var("IDENTITY_HEADER") {
            Some(raw) => HeaderName::try_from(raw.to_ascii_lowercase())
                .map_err(|_| invalid("IDENTITY_HEADER", &raw))?,
            None => defaults.identity_header,
        };

        let display_identity_rotation_secs = match var("DISPLAY_IDENTITY_ROTATION_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid("DISPLAY_IDENTITY_ROTATION_SECS", &raw))?,
            None => defaults.display_identity_rotation_secs,
        };

        let cors_allowed_origins = match var("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(|origin| HeaderValue::from_str(origin).map_err(|_| invalid("CORS_ALLOWED_ORIGINS", origin)))
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.cors_allowed_origins,
        };

        Ok(Self {
            server_addr: SocketAddr::new(host, port),
            store,
            identity_header,
            display_identity_rotation_secs,
            cors_allowed_origins,
        })
    }
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
    }
}

/// Create the CORS layer for the vote resource.
pub fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.cors_allowed_origins.clone())
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, config.identity_header.clone()])
}
