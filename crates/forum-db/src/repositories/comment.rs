//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Comment;
use forum_core::error::DomainError;
use forum_core::traits::{CommentRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::CommentModel;

use super::error::{is_foreign_key_violation, map_db_error};

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, post_id, author_id, author_username, parent_id, depth, content,
                   upvotes, downvotes, is_edited, edited_at, created_at, updated_at
            FROM comments
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn list_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let results = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, post_id, author_id, author_username, parent_id, depth, content,
                   upvotes, downvotes, is_edited, edited_at, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY id
            ",
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_author(&self, author_id: Snowflake, limit: i64) -> RepoResult<Vec<Comment>> {
        let results = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, post_id, author_id, author_username, parent_id, depth, content,
                   upvotes, downvotes, is_edited, edited_at, created_at, updated_at
            FROM comments
            WHERE author_id = $1
            ORDER BY id DESC
            LIMIT $2
            ",
        )
        .bind(author_id.into_inner())
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    /// Bumping the count first takes the post's row lock before the insert,
    /// which is the order a post or comment delete locks in.
    #[instrument(skip(self, comment), fields(comment_id = %comment.id, post_id = %comment.post_id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let bumped = sqlx::query(
            r"
            UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1
            ",
        )
        .bind(comment.post_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if bumped.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(comment.post_id));
        }

        sqlx::query(
            r"
            INSERT INTO comments (id, post_id, author_id, author_username, parent_id, depth,
                                  content, upvotes, downvotes, is_edited, edited_at,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.post_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(&comment.author_username)
        .bind(comment.parent_id.map(Snowflake::into_inner))
        .bind(comment.depth)
        .bind(&comment.content)
        .bind(comment.upvotes)
        .bind(comment.downvotes)
        .bind(comment.is_edited)
        .bind(comment.edited_at)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match comment.parent_id {
            // The parent was deleted while this reply waited on the post lock
            Some(parent_id) if is_foreign_key_violation(&e) => DomainError::CommentNotFound(parent_id),
            _ => map_db_error(e),
        })?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE comments
            SET content = $2, is_edited = $3, edited_at = $4, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(comment.id.into_inner())
        .bind(&comment.content)
        .bind(comment.is_edited)
        .bind(comment.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(comment.id));
        }

        Ok(())
    }

    /// Locks the owning post, then the subtree, so no reply or vote can land
    /// between collecting the subtree and removing it.
    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let post_id = sqlx::query_scalar::<_, i64>(
            r"
            SELECT post_id FROM comments WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::CommentNotFound(id))?;

        sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM posts WHERE id = $1 FOR NO KEY UPDATE
            ",
        )
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::CommentNotFound(id))?;

        let subtree = sqlx::query_scalar::<_, i64>(
            r"
            WITH RECURSIVE subtree AS (
                SELECT id FROM comments WHERE id = $1
                UNION ALL
                SELECT c.id FROM comments c INNER JOIN subtree s ON c.parent_id = s.id
            )
            SELECT id FROM comments WHERE id IN (SELECT id FROM subtree)
            ORDER BY id
            FOR UPDATE
            ",
        )
        .bind(id.into_inner())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if subtree.is_empty() {
            return Err(DomainError::CommentNotFound(id));
        }

        sqlx::query(
            r"
            DELETE FROM votes WHERE target_type = 'comment' AND target_id = ANY($1)
            ",
        )
        .bind(&subtree)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM comments WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let removed = subtree.len() as u64;

        sqlx::query(
            r"
            UPDATE posts SET comment_count = GREATEST(comment_count - $2, 0) WHERE id = $1
            ",
        )
        .bind(post_id)
        .bind(removed as i32)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(removed)
    }
}
