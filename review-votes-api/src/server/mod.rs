//! Server module: HTTP routing and the serve loop.
pub mod handlers;
pub mod identity;
pub mod state;

use std::net::SocketAddr;

use axum::{
    Router,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::ServerError;

pub use identity::{HeaderIdentityResolver, IdentityResolver};
pub use state::AppState;

/// Create the Axum application router with all routes and middleware.
pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route(
            "/api/votes",
            get(handlers::get_votes)
                .post(handlers::cast_vote)
                .delete(handlers::remove_vote),
        )
        .route("/api/votes/counts", get(handlers::get_vote_counts))
        .route("/health", get(handlers::health_check))
        .layer(cors)
        .with_state(state)
}

/// Run the server on the specified address until ctrl-c is received.
///
/// Binding or serving failures are reported as `ServerError::Serve`.
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);
    info!("- Votes endpoint: http://{}/api/votes", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
