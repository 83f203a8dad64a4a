use std::sync::Arc;

use review_votes_repository::{InMemoryVotesRepository, PostgresVotesRepository, VotesRepository};
use review_votes_service::{RotatingDisplayIdentity, VoteService};
use tracing::{info, warn};

use crate::config::{ApiConfig, StoreBackend};
use crate::errors::ServerError;
use crate::server::{AppState, HeaderIdentityResolver};

/// `Dependencies` holds the wired components the HTTP layer runs on.
pub struct Dependencies {
    pub vote_service: Arc<VoteService>,
    pub identity_resolver: Arc<HeaderIdentityResolver>,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance.
    ///
    /// Connects to the configured vote store, applying pending migrations for
    /// postgres, and builds the vote service on top of it.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `ServerError` if the store cannot be reached or migrated.
    pub async fn new(config: &ApiConfig) -> Result<Self, ServerError> {
        let votes_repository: Arc<dyn VotesRepository> = match &config.store {
            StoreBackend::Postgres { database_url } => {
                let pool = sqlx::PgPool::connect(database_url).await?;
                let repository = PostgresVotesRepository::new(pool).await?;
                repository.migrate().await?;
                info!("Connected to postgres vote store");
                Arc::new(repository)
            }
            StoreBackend::Memory => {
                warn!("Using in-memory vote store, votes will not survive a restart");
                Arc::new(InMemoryVotesRepository::new())
            }
        };

        Ok(Self::with_repository(config, votes_repository))
    }

    /// Wires the service over an already constructed repository.
    pub fn with_repository(config: &ApiConfig, votes_repository: Arc<dyn VotesRepository>) -> Self {
        let display_identities = Arc::new(RotatingDisplayIdentity::new(config.display_identity_rotation_secs));
        Self {
            vote_service: Arc::new(VoteService::new(votes_repository, display_identities)),
            identity_resolver: Arc::new(HeaderIdentityResolver::new(config.identity_header.clone())),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            vote_service: self.vote_service.clone(),
            identity_resolver: self.identity_resolver.clone(),
        }
    }
}
