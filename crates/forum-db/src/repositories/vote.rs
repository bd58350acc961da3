//! PostgreSQL implementation of VoteRepository
//!
//! A cast is one transaction. The target row is locked first with
//! `FOR UPDATE`, which serializes every cast on that target; the standing
//! vote is then read, the transition resolved, and the ledger row plus the
//! counters written before commit. Counters are only ever moved by relative
//! increments, so the creation baseline is never overwritten.
//!
//! Writers across the crate take row locks in one order: posts, comments,
//! chats, then users. The author's karma is written last here, and deletes
//! lock the target before clearing its votes.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use forum_core::entities::Vote;
use forum_core::error::DomainError;
use forum_core::traits::{RepoResult, VoteRepository};
use forum_core::value_objects::{
    Snowflake, TargetType, VoteDirection, VoteOutcome, VoteTally, VoteTransition,
};

use crate::mappers::parse_vote_type;
use crate::models::{VoteCounterModel, VoteModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of VoteRepository
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    /// Create a new PgVoteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn lock_target_sql(target_type: TargetType) -> &'static str {
    match target_type {
        TargetType::Post => "SELECT author_id FROM posts WHERE id = $1 FOR UPDATE",
        TargetType::Comment => "SELECT author_id FROM comments WHERE id = $1 FOR UPDATE",
    }
}

fn bump_counters_sql(target_type: TargetType) -> &'static str {
    match target_type {
        TargetType::Post => {
            "UPDATE posts SET upvotes = upvotes + $2, downvotes = downvotes + $3 \
             WHERE id = $1 RETURNING upvotes, downvotes"
        }
        TargetType::Comment => {
            "UPDATE comments SET upvotes = upvotes + $2, downvotes = downvotes + $3 \
             WHERE id = $1 RETURNING upvotes, downvotes"
        }
    }
}

fn target_not_found(target_type: TargetType, target_id: Snowflake) -> DomainError {
    match target_type {
        TargetType::Post => DomainError::PostNotFound(target_id),
        TargetType::Comment => DomainError::CommentNotFound(target_id),
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self))]
    async fn cast(
        &self,
        user_id: Snowflake,
        target_id: Snowflake,
        target_type: TargetType,
        direction: VoteDirection,
    ) -> RepoResult<VoteOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let author_id = sqlx::query_scalar::<_, i64>(lock_target_sql(target_type))
            .bind(target_id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| target_not_found(target_type, target_id))?;

        let existing = sqlx::query_scalar::<_, i16>(
            r"
            SELECT vote_type FROM votes
            WHERE user_id = $1 AND target_id = $2 AND target_type = $3
            ",
        )
        .bind(user_id.into_inner())
        .bind(target_id.into_inner())
        .bind(target_type.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .map(parse_vote_type);

        let transition = VoteTransition::resolve(existing, direction);

        match transition {
            VoteTransition::Create(dir) => {
                sqlx::query(
                    r"
                    INSERT INTO votes (user_id, target_id, target_type, vote_type)
                    VALUES ($1, $2, $3, $4)
                    ",
                )
                .bind(user_id.into_inner())
                .bind(target_id.into_inner())
                .bind(target_type.as_str())
                .bind(dir.value())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_unique_violation(e, || DomainError::DuplicateVote))?;
            }
            VoteTransition::Remove(_) => {
                sqlx::query(
                    r"
                    DELETE FROM votes
                    WHERE user_id = $1 AND target_id = $2 AND target_type = $3
                    ",
                )
                .bind(user_id.into_inner())
                .bind(target_id.into_inner())
                .bind(target_type.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
            VoteTransition::Flip { to, .. } => {
                sqlx::query(
                    r"
                    UPDATE votes SET vote_type = $4, updated_at = NOW()
                    WHERE user_id = $1 AND target_id = $2 AND target_type = $3
                    ",
                )
                .bind(user_id.into_inner())
                .bind(target_id.into_inner())
                .bind(target_type.as_str())
                .bind(to.value())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
        }

        let delta = transition.delta();

        let counters = sqlx::query_as::<_, VoteCounterModel>(bump_counters_sql(target_type))
            .bind(target_id.into_inner())
            .bind(delta.upvotes)
            .bind(delta.downvotes)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let net = delta.net();
        if net != 0 {
            sqlx::query(
                r"
                UPDATE users SET karma = karma + $2 WHERE id = $1
                ",
            )
            .bind(author_id)
            .bind(i64::from(net))
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        debug!(
            ?transition,
            upvotes = counters.upvotes,
            downvotes = counters.downvotes,
            "Vote applied"
        );

        Ok(VoteOutcome {
            target_id,
            target_type,
            author_id: Snowflake::new(author_id),
            transition,
            tally: VoteTally::new(counters.upvotes, counters.downvotes),
        })
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        user_id: Snowflake,
        target_id: Snowflake,
        target_type: TargetType,
    ) -> RepoResult<Option<Vote>> {
        let result = sqlx::query_as::<_, VoteModel>(
            r"
            SELECT user_id, target_id, target_type, vote_type, created_at, updated_at
            FROM votes
            WHERE user_id = $1 AND target_id = $2 AND target_type = $3
            ",
        )
        .bind(user_id.into_inner())
        .bind(target_id.into_inner())
        .bind(target_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Vote::from))
    }

    #[instrument(skip(self, target_ids), fields(count = target_ids.len()))]
    async fn find_for_targets(
        &self,
        user_id: Snowflake,
        target_ids: &[Snowflake],
        target_type: TargetType,
    ) -> RepoResult<HashMap<Snowflake, VoteDirection>> {
        if target_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let raw_ids: Vec<i64> = target_ids.iter().map(|id| id.into_inner()).collect();
        let rows = sqlx::query_as::<_, (i64, i16)>(
            r"
            SELECT target_id, vote_type FROM votes
            WHERE user_id = $1 AND target_type = $2 AND target_id = ANY($3)
            ",
        )
        .bind(user_id.into_inner())
        .bind(target_type.as_str())
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, vote_type)| (Snowflake::new(id), parse_vote_type(vote_type)))
            .collect())
    }

    #[instrument(skip(self))]
    async fn ledger_totals(
        &self,
        target_id: Snowflake,
        target_type: TargetType,
    ) -> RepoResult<(i64, i64)> {
        let totals = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT COUNT(*) FILTER (WHERE vote_type = 1),
                   COUNT(*) FILTER (WHERE vote_type = -1)
            FROM votes
            WHERE target_id = $1 AND target_type = $2
            ",
        )
        .bind(target_id.into_inner())
        .bind(target_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(totals)
    }
}
