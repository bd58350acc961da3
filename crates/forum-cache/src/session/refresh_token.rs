//! Refresh token storage in Redis.
//!
//! Each issued refresh token is stored under its `jti`; a per-user set tracks
//! the live ids so every session can be revoked at once.

use crate::pool::{RedisPool, RedisResult};
use forum_core::Snowflake;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";
const USER_TOKENS_PREFIX: &str = "user_tokens:";

/// 7 days
const DEFAULT_REFRESH_TOKEN_TTL: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenData {
    pub user_id: Snowflake,
    /// Shared by every token issued for one login
    pub session_id: String,
    /// Unix seconds
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl RefreshTokenData {
    #[must_use]
    pub fn new(user_id: Snowflake, session_id: impl Into<String>) -> Self {
        Self {
            user_id,
            session_id: session_id.into(),
            created_at: chrono::Utc::now().timestamp(),
            user_agent: None,
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct RefreshTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshTokenStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }

    /// TTL should match the refresh token lifetime
    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token_id: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token_id}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_TOKENS_PREFIX}{user_id}")
    }

    pub async fn store(&self, token_id: &str, data: &RefreshTokenData) -> RedisResult<()> {
        self.pool
            .set(&Self::key(token_id), data, Some(self.ttl_seconds))
            .await?;

        let user_key = Self::user_key(data.user_id);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&user_key, token_id).await?;
        conn.expire::<_, ()>(&user_key, self.ttl_seconds as i64).await?;

        tracing::debug!(
            token_id = %token_id,
            user_id = %data.user_id,
            session_id = %data.session_id,
            "Stored refresh token"
        );

        Ok(())
    }

    pub async fn get(&self, token_id: &str) -> RedisResult<Option<RefreshTokenData>> {
        self.pool.get_value(&Self::key(token_id)).await
    }

    /// The stored data if the token is still live and belongs to `user_id`
    pub async fn validate(
        &self,
        token_id: &str,
        user_id: Snowflake,
    ) -> RedisResult<Option<RefreshTokenData>> {
        Ok(self
            .get(token_id)
            .await?
            .filter(|data| data.user_id == user_id))
    }

    pub async fn revoke(&self, token_id: &str) -> RedisResult<bool> {
        if let Some(data) = self.get(token_id).await? {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(&Self::user_key(data.user_id), token_id)
                .await?;
        }

        let deleted = self.pool.delete(&Self::key(token_id)).await?;
        if deleted {
            tracing::debug!(token_id = %token_id, "Revoked refresh token");
        }

        Ok(deleted)
    }

    /// Log out everywhere
    pub async fn revoke_all_for_user(&self, user_id: Snowflake) -> RedisResult<u32> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;

        let token_ids: Vec<String> = conn.smembers(&user_key).await?;
        let count = token_ids.len() as u32;

        let keys: Vec<String> = token_ids.iter().map(|id| Self::key(id)).collect();
        self.pool.delete_many(&keys).await?;
        conn.del::<_, ()>(&user_key).await?;

        tracing::info!(user_id = %user_id, count, "Revoked all refresh tokens for user");

        Ok(count)
    }
}
