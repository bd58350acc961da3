//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Post;
use forum_core::error::DomainError;
use forum_core::traits::{PostQuery, PostRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::PostModel;

use super::error::map_db_error;

const MAX_PAGE_SIZE: i64 = 100;

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn raw_ids(ids: &[Snowflake]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, title, post_type, content, author_id, author_username, community_id,
                   community_name, upvotes, downvotes, comment_count, is_edited, edited_at,
                   created_at, updated_at
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: PostQuery) -> RepoResult<Vec<Post>> {
        // An explicit empty community filter matches nothing
        if query.community_ids.as_ref().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }

        let community_ids = query.community_ids.as_deref().map(raw_ids);

        let results = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, title, post_type, content, author_id, author_username, community_id,
                   community_name, upvotes, downvotes, comment_count, is_edited, edited_at,
                   created_at, updated_at
            FROM posts
            WHERE ($1::BIGINT[] IS NULL OR community_id = ANY($1))
              AND ($2::BIGINT IS NULL OR author_id = $2)
              AND ($3::BIGINT IS NULL OR id < $3)
            ORDER BY id DESC
            LIMIT $4
            ",
        )
        .bind(community_ids)
        .bind(query.author_id.map(Snowflake::into_inner))
        .bind(query.before.map(Snowflake::into_inner))
        .bind(query.limit.clamp(1, MAX_PAGE_SIZE))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, title, post_type, content, author_id, author_username,
                               community_id, community_name, upvotes, downvotes, comment_count,
                               is_edited, edited_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(post.id.into_inner())
        .bind(&post.title)
        .bind(post.post_type.as_str())
        .bind(&post.content)
        .bind(post.author_id.into_inner())
        .bind(&post.author_username)
        .bind(post.community_id.into_inner())
        .bind(&post.community_name)
        .bind(post.upvotes)
        .bind(post.downvotes)
        .bind(post.comment_count)
        .bind(post.is_edited)
        .bind(post.edited_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update(&self, post: &Post) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET title = $2, content = $3, is_edited = $4, edited_at = $5, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(post.id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.is_edited)
        .bind(post.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(post.id));
        }

        Ok(())
    }

    /// Locks the post and then its comments before clearing votes. A cast
    /// that already holds one of those rows finishes first; one that arrives
    /// later finds the target gone. Either way no ledger row outlives it.
    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM posts WHERE id = $1 FOR UPDATE
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::PostNotFound(id))?;

        let comment_ids = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM comments WHERE post_id = $1 ORDER BY id FOR UPDATE
            ",
        )
        .bind(id.into_inner())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Votes reference their target loosely, so clear them first
        sqlx::query(
            r"
            DELETE FROM votes
            WHERE (target_type = 'post' AND target_id = $1)
               OR (target_type = 'comment' AND target_id = ANY($2))
            ",
        )
        .bind(id.into_inner())
        .bind(&comment_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM posts WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn toggle_saved(&self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool> {
        let removed = sqlx::query(
            r"
            DELETE FROM saved_posts WHERE user_id = $1 AND post_id = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if removed > 0 {
            return Ok(false);
        }

        sqlx::query(
            r"
            INSERT INTO saved_posts (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO NOTHING
            ",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(true)
    }

    #[instrument(skip(self, post_ids))]
    async fn saved_among(
        &self,
        user_id: Snowflake,
        post_ids: &[Snowflake],
    ) -> RepoResult<Vec<Snowflake>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_scalar::<_, i64>(
            r"
            SELECT post_id FROM saved_posts WHERE user_id = $1 AND post_id = ANY($2)
            ",
        )
        .bind(user_id.into_inner())
        .bind(raw_ids(post_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn list_saved(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Post>> {
        let results = sqlx::query_as::<_, PostModel>(
            r"
            SELECT p.id, p.title, p.post_type, p.content, p.author_id, p.author_username,
                   p.community_id, p.community_name, p.upvotes, p.downvotes, p.comment_count,
                   p.is_edited, p.edited_at, p.created_at, p.updated_at
            FROM posts p
            INNER JOIN saved_posts s ON s.post_id = p.id
            WHERE s.user_id = $1
            ORDER BY s.saved_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(limit.clamp(1, MAX_PAGE_SIZE))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgPostRepository>();
    }

    #[test]
    fn test_raw_ids() {
        assert_eq!(raw_ids(&[Snowflake::new(3), Snowflake::new(9)]), vec![3, 9]);
    }
}
