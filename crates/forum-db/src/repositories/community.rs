//! PostgreSQL implementation of CommunityRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Community;
use forum_core::error::DomainError;
use forum_core::traits::{CommunityRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::CommunityModel;

use super::error::{map_db_error, map_unique_violation};
use super::pattern::contains_pattern;

/// PostgreSQL implementation of CommunityRepository
#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    /// Create a new PgCommunityRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityRepository for PgCommunityRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Community>> {
        let result = sqlx::query_as::<_, CommunityModel>(
            r"
            SELECT id, name, display_name, title, description, icon_url, banner_url, creator_id,
                   creator_username, member_count, category, rules, created_at, updated_at
            FROM communities
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Community::from))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Community>> {
        let result = sqlx::query_as::<_, CommunityModel>(
            r"
            SELECT id, name, display_name, title, description, icon_url, banner_url, creator_id,
                   creator_username, member_count, category, rules, created_at, updated_at
            FROM communities
            WHERE name = LOWER($1)
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Community::from))
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Community>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let results = sqlx::query_as::<_, CommunityModel>(
            r"
            SELECT id, name, display_name, title, description, icon_url, banner_url, creator_id,
                   creator_username, member_count, category, rules, created_at, updated_at
            FROM communities
            WHERE id = ANY($1)
            ORDER BY name
            ",
        )
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Community::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_popular(&self, limit: i64) -> RepoResult<Vec<Community>> {
        let results = sqlx::query_as::<_, CommunityModel>(
            r"
            SELECT id, name, display_name, title, description, icon_url, banner_url, creator_id,
                   creator_username, member_count, category, rules, created_at, updated_at
            FROM communities
            ORDER BY member_count DESC, name
            LIMIT $1
            ",
        )
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Community::from).collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<Community>> {
        let results = sqlx::query_as::<_, CommunityModel>(
            r"
            SELECT id, name, display_name, title, description, icon_url, banner_url, creator_id,
                   creator_username, member_count, category, rules, created_at, updated_at
            FROM communities
            WHERE name ILIKE $1 OR title ILIKE $1
            ORDER BY member_count DESC, name
            LIMIT $2
            ",
        )
        .bind(contains_pattern(query))
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Community::from).collect())
    }

    #[instrument(skip(self, community), fields(community_id = %community.id))]
    async fn create(&self, community: &Community) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO communities (id, name, display_name, title, description, icon_url,
                                     banner_url, creator_id, creator_username, member_count,
                                     category, rules, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 1, $10, $11, $12, $13)
            ",
        )
        .bind(community.id.into_inner())
        .bind(&community.name)
        .bind(&community.display_name)
        .bind(&community.title)
        .bind(&community.description)
        .bind(&community.icon_url)
        .bind(&community.banner_url)
        .bind(community.creator_id.into_inner())
        .bind(&community.creator_username)
        .bind(&community.category)
        .bind(&community.rules)
        .bind(community.created_at)
        .bind(community.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::CommunityNameTaken))?;

        sqlx::query(
            r"
            INSERT INTO community_members (community_id, user_id) VALUES ($1, $2)
            ",
        )
        .bind(community.id.into_inner())
        .bind(community.creator_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn join(&self, community_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query(
            r"
            INSERT INTO community_members (community_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (community_id, user_id) DO NOTHING
            ",
        )
        .bind(community_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            > 0;

        if inserted {
            sqlx::query(
                r"
                UPDATE communities SET member_count = member_count + 1 WHERE id = $1
                ",
            )
            .bind(community_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn leave(&self, community_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query(
            r"
            DELETE FROM community_members WHERE community_id = $1 AND user_id = $2
            ",
        )
        .bind(community_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            > 0;

        if removed {
            sqlx::query(
                r"
                UPDATE communities SET member_count = GREATEST(member_count - 1, 0) WHERE id = $1
                ",
            )
            .bind(community_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn is_member(&self, community_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM community_members WHERE community_id = $1 AND user_id = $2
            )
            ",
        )
        .bind(community_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn list_joined(&self, user_id: Snowflake) -> RepoResult<Vec<Community>> {
        let results = sqlx::query_as::<_, CommunityModel>(
            r"
            SELECT c.id, c.name, c.display_name, c.title, c.description, c.icon_url, c.banner_url,
                   c.creator_id, c.creator_username, c.member_count, c.category, c.rules,
                   c.created_at, c.updated_at
            FROM communities c
            INNER JOIN community_members m ON m.community_id = c.id
            WHERE m.user_id = $1
            ORDER BY c.name
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Community::from).collect())
    }
}
