//! Drives a live server through the HTTP client transport and the optimistic controller.
use std::sync::Arc;

use review_votes_api::{
    ApiConfig, Dependencies, ServerError,
    config::create_cors_layer,
    server::{create_app, run_server},
};
use review_votes_client::{ClientVoteController, ControllerConfig, HttpVoteApi, VoteApi, VoteAttempt};
use review_votes_repository::InMemoryVotesRepository;
use review_votes_shared::types::{CallerIdentity, VoteAction, VoteDirection, VoteTally};
use uuid::Uuid;

async fn spawn_server() -> String {
    let config = ApiConfig::default();
    let dependencies = Dependencies::with_repository(&config, Arc::new(InMemoryVotesRepository::new()));
    let app = create_app(dependencies.app_state(), create_cors_layer(&config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn api(base_url: &str, caller: Option<&str>) -> HttpVoteApi {
    HttpVoteApi::new(base_url, caller.and_then(CallerIdentity::parse))
}

#[tokio::test]
async fn test_http_transport_round_trip() {
    let base_url = spawn_server().await;
    let api = api(&base_url, Some("user-1"));
    let review_id = Uuid::new_v4();

    let outcome = api.cast_vote(review_id, VoteDirection::Helpful).await.unwrap();
    assert_eq!(outcome.action, VoteAction::Created);
    assert_eq!(outcome.direction, Some(VoteDirection::Helpful));

    let outcome = api.cast_vote(review_id, VoteDirection::Unhelpful).await.unwrap();
    assert_eq!(outcome.action, VoteAction::Updated);

    let votes = api.fetch_votes(&[review_id]).await.unwrap();
    assert_eq!(votes.get(&review_id), Some(&VoteDirection::Unhelpful));

    let counts = api.fetch_counts(&[review_id]).await.unwrap();
    assert_eq!(counts.get(&review_id), Some(&VoteTally::new(0, 1)));

    let outcome = api.remove_vote(review_id).await.unwrap();
    assert_eq!(outcome.action, VoteAction::Deleted);
    assert!(api.fetch_votes(&[review_id]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_anonymous_transport_is_rejected_on_mutation() {
    let base_url = spawn_server().await;
    let api = api(&base_url, None);
    let review_id = Uuid::new_v4();

    let err = api.cast_vote(review_id, VoteDirection::Helpful).await.unwrap_err();
    assert!(err.to_string().contains("Authentication required"), "{err}");

    assert!(api.fetch_votes(&[review_id]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_controller_against_live_server() {
    let base_url = spawn_server().await;
    let controller = ClientVoteController::new(
        Arc::new(api(&base_url, Some("user-1"))),
        ControllerConfig::default(),
    );
    let other_voter = api(&base_url, Some("user-2"));
    let review_id = Uuid::new_v4();

    other_voter.cast_vote(review_id, VoteDirection::Helpful).await.unwrap();
    controller.refresh_votes(&[review_id]).await.unwrap();
    assert_eq!(controller.state(review_id).tally, VoteTally::new(1, 0));
    assert_eq!(controller.state(review_id).direction, None);

    let attempt = controller.cast_vote(review_id, VoteDirection::Helpful).await;
    assert_eq!(attempt, VoteAttempt::Confirmed(Some(VoteDirection::Helpful)));
    assert_eq!(controller.state(review_id).tally, VoteTally::new(2, 0));

    let attempt = controller.cast_vote(review_id, VoteDirection::Unhelpful).await;
    assert_eq!(attempt, VoteAttempt::Confirmed(Some(VoteDirection::Unhelpful)));
    assert_eq!(controller.state(review_id).tally, VoteTally::new(1, 1));

    let attempt = controller.toggle_vote(review_id, VoteDirection::Unhelpful).await;
    assert_eq!(attempt, VoteAttempt::Confirmed(None));
    assert_eq!(controller.state(review_id).tally, VoteTally::new(1, 0));

    controller.refresh_votes(&[review_id]).await.unwrap();
    assert_eq!(controller.state(review_id).direction, None);
    assert_eq!(controller.state(review_id).tally, VoteTally::new(1, 0));
}

#[tokio::test]
async fn test_controller_rolls_back_when_server_unreachable() {
    // Nothing listens on the discard port of the loopback interface.
    let controller = ClientVoteController::new(
        Arc::new(api("http://127.0.0.1:9", Some("user-1"))),
        ControllerConfig::default(),
    );
    let mut notices = controller.subscribe();
    let review_id = Uuid::new_v4();
    controller.seed(review_id, VoteTally::new(4, 2));

    let attempt = controller.cast_vote(review_id, VoteDirection::Helpful).await;

    assert_eq!(attempt, VoteAttempt::RolledBack);
    assert_eq!(controller.state(review_id).tally, VoteTally::new(4, 2));
    assert_eq!(controller.state(review_id).direction, None);
    assert_eq!(notices.recv().await.unwrap().review_id, review_id);
}

#[tokio::test]
async fn test_run_server_reports_bind_failure() {
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = occupied.local_addr().unwrap();
    let config = ApiConfig::default();
    let dependencies = Dependencies::with_repository(&config, Arc::new(InMemoryVotesRepository::new()));
    let app = create_app(dependencies.app_state(), create_cors_layer(&config));

    let result = run_server(app, addr).await;

    assert!(matches!(result, Err(ServerError::Serve(_))));
}
