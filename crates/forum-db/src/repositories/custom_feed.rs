//! PostgreSQL implementation of CustomFeedRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::CustomFeed;
use forum_core::error::DomainError;
use forum_core::traits::{CustomFeedRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::CustomFeedModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of CustomFeedRepository
#[derive(Clone)]
pub struct PgCustomFeedRepository {
    pool: PgPool,
}

impl PgCustomFeedRepository {
    /// Create a new PgCustomFeedRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomFeedRepository for PgCustomFeedRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CustomFeed>> {
        let result = sqlx::query_as::<_, CustomFeedModel>(
            r"
            SELECT f.id, f.name, f.description, f.creator_id, f.creator_username,
                   ARRAY(SELECT community_id FROM custom_feed_communities
                         WHERE feed_id = f.id ORDER BY added_at) AS community_ids,
                   f.is_private, f.show_on_profile, f.is_favorite, f.icon_color,
                   f.created_at, f.updated_at
            FROM custom_feeds f
            WHERE f.id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(CustomFeed::from))
    }

    #[instrument(skip(self))]
    async fn list_by_creator(&self, creator_id: Snowflake) -> RepoResult<Vec<CustomFeed>> {
        let results = sqlx::query_as::<_, CustomFeedModel>(
            r"
            SELECT f.id, f.name, f.description, f.creator_id, f.creator_username,
                   ARRAY(SELECT community_id FROM custom_feed_communities
                         WHERE feed_id = f.id ORDER BY added_at) AS community_ids,
                   f.is_private, f.show_on_profile, f.is_favorite, f.icon_color,
                   f.created_at, f.updated_at
            FROM custom_feeds f
            WHERE f.creator_id = $1
            ORDER BY f.is_favorite DESC, f.name
            ",
        )
        .bind(creator_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(CustomFeed::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_public_by_creator(
        &self,
        creator_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<CustomFeed>> {
        let results = sqlx::query_as::<_, CustomFeedModel>(
            r"
            SELECT f.id, f.name, f.description, f.creator_id, f.creator_username,
                   ARRAY(SELECT community_id FROM custom_feed_communities
                         WHERE feed_id = f.id ORDER BY added_at) AS community_ids,
                   f.is_private, f.show_on_profile, f.is_favorite, f.icon_color,
                   f.created_at, f.updated_at
            FROM custom_feeds f
            WHERE f.creator_id = $1 AND f.is_private = FALSE AND f.show_on_profile = TRUE
            ORDER BY f.name
            LIMIT $2
            ",
        )
        .bind(creator_id.into_inner())
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(CustomFeed::from).collect())
    }

    #[instrument(skip(self))]
    async fn name_exists(
        &self,
        creator_id: Snowflake,
        name: &str,
        excluding: Option<Snowflake>,
    ) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM custom_feeds
                WHERE creator_id = $1 AND LOWER(name) = LOWER($2)
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )
            ",
        )
        .bind(creator_id.into_inner())
        .bind(name)
        .bind(excluding.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, feed), fields(feed_id = %feed.id))]
    async fn create(&self, feed: &CustomFeed) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO custom_feeds (id, name, description, creator_id, creator_username,
                                      is_private, show_on_profile, is_favorite, icon_color,
                                      created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(feed.id.into_inner())
        .bind(&feed.name)
        .bind(&feed.description)
        .bind(feed.creator_id.into_inner())
        .bind(&feed.creator_username)
        .bind(feed.is_private)
        .bind(feed.show_on_profile)
        .bind(feed.is_favorite)
        .bind(&feed.icon_color)
        .bind(feed.created_at)
        .bind(feed.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::CustomFeedNameTaken))?;

        Ok(())
    }

    #[instrument(skip(self, feed), fields(feed_id = %feed.id))]
    async fn update(&self, feed: &CustomFeed) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE custom_feeds
            SET name = $2, description = $3, is_private = $4, show_on_profile = $5,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(feed.id.into_inner())
        .bind(&feed.name)
        .bind(&feed.description)
        .bind(feed.is_private)
        .bind(feed.show_on_profile)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::CustomFeedNameTaken))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CustomFeedNotFound(feed.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn toggle_favorite(&self, id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            UPDATE custom_feeds
            SET is_favorite = NOT is_favorite, updated_at = NOW()
            WHERE id = $1
            RETURNING is_favorite
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::CustomFeedNotFound(id))
    }

    #[instrument(skip(self))]
    async fn add_community(&self, feed_id: Snowflake, community_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO custom_feed_communities (feed_id, community_id)
            VALUES ($1, $2)
            ON CONFLICT (feed_id, community_id) DO NOTHING
            ",
        )
        .bind(feed_id.into_inner())
        .bind(community_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn remove_community(
        &self,
        feed_id: Snowflake,
        community_id: Snowflake,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM custom_feed_communities WHERE feed_id = $1 AND community_id = $2
            ",
        )
        .bind(feed_id.into_inner())
        .bind(community_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM custom_feeds WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CustomFeedNotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgCustomFeedRepository>();
    }
}
