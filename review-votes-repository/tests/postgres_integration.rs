//! Integration tests for PostgreSQL votes repository implementation.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup. They are ignored by default.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_integration -- --ignored`

use chrono::{Duration, SubsecRound, Utc};
use review_votes_repository::{PostgresVotesRepository, VotesRepository, VotesRepositoryError};
use review_votes_shared::types::{CallerIdentity, DisplayIdentity, Vote, VoteDirection, VoteTally};
use sqlx::Row;
use uuid::Uuid;

/// Creates a test vote with default values.
fn make_vote(review_id: Uuid, caller: &str, direction: VoteDirection) -> Vote {
    Vote::new(
        review_id,
        CallerIdentity::parse(caller).unwrap(),
        DisplayIdentity::new("anon-1a2b3c4d"),
        direction,
        // Postgres keeps microseconds only.
        Utc::now().trunc_subsecs(6),
    )
}

// ============================================================================
// Single Vote Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_and_find_vote(pool: sqlx::PgPool) {
    let repository = PostgresVotesRepository::new(pool.clone()).await.unwrap();
    let vote = make_vote(Uuid::new_v4(), "user-1", VoteDirection::Helpful);

    let stored = repository.insert(&vote).await.unwrap();
    assert_eq!(stored, vote);

    let found = repository
        .find_one(vote.review_id, &vote.caller_identity)
        .await
        .unwrap();
    assert_eq!(found, Some(vote.clone()));

    let row = sqlx::query("SELECT vote_type FROM review_votes WHERE id = $1")
        .bind(vote.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<i16, _>("vote_type"), 0);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_insert_is_conflict(pool: sqlx::PgPool) {
    let repository = PostgresVotesRepository::new(pool.clone()).await.unwrap();
    let review_id = Uuid::new_v4();
    repository
        .insert(&make_vote(review_id, "user-1", VoteDirection::Helpful))
        .await
        .unwrap();

    let result = repository
        .insert(&make_vote(review_id, "user-1", VoteDirection::Unhelpful))
        .await;
    assert!(matches!(result, Err(VotesRepositoryError::Conflict { .. })));

    let rows = sqlx::query("SELECT * FROM review_votes")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_update_direction(pool: sqlx::PgPool) {
    let repository = PostgresVotesRepository::new(pool.clone()).await.unwrap();
    let vote = make_vote(Uuid::new_v4(), "user-1", VoteDirection::Helpful);
    repository.insert(&vote).await.unwrap();

    let later = vote.created_at + Duration::seconds(30);
    let updated = repository
        .update_direction(vote.id, VoteDirection::Unhelpful, &DisplayIdentity::new("anon-99999999"), later)
        .await
        .unwrap();

    assert_eq!(updated.direction, VoteDirection::Unhelpful);
    assert_eq!(updated.display_identity.as_str(), "anon-99999999");
    assert_eq!(updated.created_at, later);

    let missing = repository
        .update_direction(Uuid::new_v4(), VoteDirection::Helpful, &DisplayIdentity::new("anon"), later)
        .await;
    assert!(matches!(missing, Err(VotesRepositoryError::NotFound(_))));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_vote(pool: sqlx::PgPool) {
    let repository = PostgresVotesRepository::new(pool.clone()).await.unwrap();
    let vote = make_vote(Uuid::new_v4(), "user-1", VoteDirection::Unhelpful);
    repository.insert(&vote).await.unwrap();

    repository.delete(vote.id).await.unwrap();
    repository.delete(vote.id).await.unwrap();

    let found = repository
        .find_one(vote.review_id, &vote.caller_identity)
        .await
        .unwrap();
    assert!(found.is_none());
}

// ============================================================================
// Batch Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_find_many_and_count_votes(pool: sqlx::PgPool) {
    let repository = PostgresVotesRepository::new(pool.clone()).await.unwrap();
    let (r1, r2) = (Uuid::new_v4(), Uuid::new_v4());
    for vote in [
        make_vote(r1, "user-1", VoteDirection::Helpful),
        make_vote(r1, "user-2", VoteDirection::Unhelpful),
        make_vote(r1, "user-3", VoteDirection::Helpful),
        make_vote(r2, "user-1", VoteDirection::Unhelpful),
    ] {
        repository.insert(&vote).await.unwrap();
    }

    let caller = CallerIdentity::parse("user-1").unwrap();
    let votes = repository.find_many(&[r1, r2], &caller).await.unwrap();
    assert_eq!(votes.len(), 2);

    let counts: std::collections::HashMap<_, _> =
        repository.count_votes(&[r1, r2]).await.unwrap().into_iter().collect();
    assert_eq!(counts[&r1], VoteTally::new(2, 1));
    assert_eq!(counts[&r2], VoteTally::new(0, 1));

    assert!(repository.find_many(&[], &caller).await.unwrap().is_empty());
    assert!(repository.count_votes(&[]).await.unwrap().is_empty());
}
