//! PostgreSQL implementation of the votes repository.
//!
//! Every operation is a point lookup or mutation against the `review_votes`
//! table. The unique index on `(review_id, caller_identity)` is what serializes
//! racing inserts; a violation is reported as `VotesRepositoryError::Conflict`.
//!
//! Vote directions are stored as `SMALLINT`: `0` for helpful, `1` for unhelpful.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use review_votes_shared::types::{CallerIdentity, DisplayIdentity, Vote, VoteDirection, VoteTally};
use uuid::Uuid;
use crate::{VotesRepository, VotesRepositoryError};

const VOTE_COLUMNS: &str = "id, review_id, caller_identity, display_identity, vote_type, created_at";

/// PostgreSQL implementation of the votes repository.
///
/// Uses a shared `sqlx::PgPool`; no transaction spans more than one statement
/// because the service never needs multi-row atomicity.
pub struct PostgresVotesRepository {
    pool: sqlx::PgPool,
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    id: Uuid,
    review_id: Uuid,
    caller_identity: String,
    display_identity: String,
    vote_type: i16,
    created_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = VotesRepositoryError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Vote {
            id: row.id,
            review_id: row.review_id,
            caller_identity: CallerIdentity::parse(&row.caller_identity)
                .ok_or(VotesRepositoryError::InvalidCallerIdentity(row.id))?,
            display_identity: DisplayIdentity::new(row.display_identity),
            direction: direction_from_code(row.vote_type)?,
            created_at: row.created_at,
        })
    }
}

fn direction_code(direction: VoteDirection) -> i16 {
    match direction {
        VoteDirection::Helpful => 0,
        VoteDirection::Unhelpful => 1,
    }
}

fn direction_from_code(code: i16) -> Result<VoteDirection, VotesRepositoryError> {
    match code {
        0 => Ok(VoteDirection::Helpful),
        1 => Ok(VoteDirection::Unhelpful),
        other => Err(VotesRepositoryError::InvalidVoteType(other)),
    }
}

impl PostgresVotesRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresVotesRepository)` - Ready-to-use repository instance
    /// * `Err(VotesRepositoryError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, VotesRepositoryError> {
        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), VotesRepositoryError> {
        sqlx::migrate!("src/postgres/migrations").run(&self.pool).await?;
        info!("Vote store migrations applied");
        Ok(())
    }
}

#[async_trait]
impl VotesRepository for PostgresVotesRepository {
    async fn find_one(
        &self,
        review_id: Uuid,
        caller_identity: &CallerIdentity,
    ) -> Result<Option<Vote>, VotesRepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(&format!(
            "SELECT {VOTE_COLUMNS} FROM review_votes WHERE review_id = $1 AND caller_identity = $2"
        ))
        .bind(review_id)
        .bind(caller_identity.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Vote::try_from).transpose()
    }

    /// Inserts a vote, translating a unique-index violation into `Conflict`.
    async fn insert(&self, vote: &Vote) -> Result<Vote, VotesRepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(&format!(
            r#"
            INSERT INTO review_votes (id, review_id, caller_identity, display_identity, vote_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {VOTE_COLUMNS}
            "#
        ))
        .bind(vote.id)
        .bind(vote.review_id)
        .bind(vote.caller_identity.as_str())
        .bind(vote.display_identity.as_str())
        .bind(direction_code(vote.direction))
        .bind(vote.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                debug!(review_id = %vote.review_id, "Unique violation on vote insert");
                VotesRepositoryError::Conflict {
                    review_id: vote.review_id,
                    caller_identity: vote.caller_identity.to_string(),
                }
            }
            other => VotesRepositoryError::DatabaseError(other),
        })?;

        Vote::try_from(row)
    }

    async fn update_direction(
        &self,
        vote_id: Uuid,
        direction: VoteDirection,
        display_identity: &DisplayIdentity,
        voted_at: DateTime<Utc>,
    ) -> Result<Vote, VotesRepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(&format!(
            r#"
            UPDATE review_votes
            SET vote_type = $2, display_identity = $3, created_at = $4
            WHERE id = $1
            RETURNING {VOTE_COLUMNS}
            "#
        ))
        .bind(vote_id)
        .bind(direction_code(direction))
        .bind(display_identity.as_str())
        .bind(voted_at)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(VotesRepositoryError::NotFound(vote_id))
            .and_then(Vote::try_from)
    }

    async fn delete(&self, vote_id: Uuid) -> Result<(), VotesRepositoryError> {
        sqlx::query("DELETE FROM review_votes WHERE id = $1")
            .bind(vote_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Uses `= ANY($1)` so the whole batch is resolved in one round trip.
    async fn find_many(
        &self,
        review_ids: &[Uuid],
        caller_identity: &CallerIdentity,
    ) -> Result<Vec<Vote>, VotesRepositoryError> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, VoteRow>(&format!(
            "SELECT {VOTE_COLUMNS} FROM review_votes WHERE review_id = ANY($1) AND caller_identity = $2"
        ))
        .bind(review_ids)
        .bind(caller_identity.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Vote::try_from).collect()
    }

    async fn count_votes(
        &self,
        review_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, VoteTally)>, VotesRepositoryError> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(Uuid, i64, i64)> = sqlx::query_as(
            r#"
            SELECT review_id,
                   COUNT(*) FILTER (WHERE vote_type = 0) AS helpful,
                   COUNT(*) FILTER (WHERE vote_type = 1) AS unhelpful
            FROM review_votes
            WHERE review_id = ANY($1)
            GROUP BY review_id
            "#,
        )
        .bind(review_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(review_id, helpful, unhelpful)| (review_id, VoteTally::new(helpful, unhelpful)))
            .collect())
    }
}
