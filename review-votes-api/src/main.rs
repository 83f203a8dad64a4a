//! Review Votes API entry point.
//!
//! Serves the vote resource over HTTP on top of the configured vote store.
use dotenv::dotenv;
use review_votes_api::{
    ApiConfig, Dependencies, ServerError, StoreBackend,
    config::create_cors_layer,
    server::{create_app, run_server},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("review_votes_api=info,review_votes_service=info,review_votes_repository=info")
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "review-votes-api",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    dotenv().ok();
    init_tracing();

    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    info!(addr = %config.server_addr, store = store_kind(&config), "Starting review votes API");

    let dependencies = match Dependencies::new(&config).await {
        Ok(dependencies) => dependencies,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = create_app(dependencies.app_state(), create_cors_layer(&config));
    run_server(app, config.server_addr).await
}

fn store_kind(config: &ApiConfig) -> &'static str {
    match config.store {
        StoreBackend::Postgres { .. } => "postgres",
        StoreBackend::Memory => "memory",
    }
}
