// App state for the Axum server
use std::sync::Arc;

use review_votes_service::VoteService;

use crate::server::identity::IdentityResolver;

#[derive(Clone)]
pub struct AppState {
    pub vote_service: Arc<VoteService>,
    pub identity_resolver: Arc<dyn IdentityResolver>,
}
