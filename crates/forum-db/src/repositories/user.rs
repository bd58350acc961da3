//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::User;
use forum_core::error::DomainError;
use forum_core::traits::{RepoResult, UserRepository};
use forum_core::value_objects::Snowflake;

use crate::models::UserModel;

use super::error::{is_unique_violation, map_db_error, map_unique_violation};
use super::pattern::contains_pattern;

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Every denormalized copy of a username, keyed by the owner's id
const RENAME_STATEMENTS: [&str; 8] = [
    "UPDATE posts SET author_username = $2 WHERE author_id = $1",
    "UPDATE comments SET author_username = $2 WHERE author_id = $1",
    "UPDATE communities SET creator_username = $2 WHERE creator_id = $1",
    "UPDATE custom_feeds SET creator_username = $2 WHERE creator_id = $1",
    "UPDATE notifications SET from_username = $2 WHERE from_user_id = $1",
    "UPDATE chats SET last_sender_username = $2 WHERE last_sender_id = $1",
    "UPDATE chat_participants SET username = $2 WHERE user_id = $1",
    "UPDATE chat_messages SET sender_username = $2 WHERE sender_id = $1",
];

/// Unique violations on users are either the username or the email index
fn map_user_conflict(e: sqlx::Error) -> DomainError {
    let on_username = e
        .as_database_error()
        .and_then(|db_err| db_err.constraint())
        .is_some_and(|c| c.contains("username"));
    map_unique_violation(e, || {
        if on_username {
            DomainError::UsernameTaken
        } else {
            DomainError::EmailAlreadyExists
        }
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, display_name, email, avatar, bio, banner_color, banner_url,
                   karma, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, display_name, email, avatar, bio, banner_color, banner_url,
                   karma, created_at, updated_at
            FROM users
            WHERE username = LOWER($1)
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, display_name, email, avatar, bio, banner_color, banner_url,
                   karma, created_at, updated_at
            FROM users
            WHERE email = LOWER($1)
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<User>> {
        let results = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, display_name, email, avatar, bio, banner_color, banner_url,
                   karma, created_at, updated_at
            FROM users
            WHERE username ILIKE $1 OR display_name ILIKE $1
            ORDER BY karma DESC, username
            LIMIT $2
            ",
        )
        .bind(contains_pattern(query))
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = LOWER($1))
            ",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = LOWER($1))
            ",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, display_name, email, password_hash, avatar, bio,
                               banner_color, banner_url, karma, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.avatar)
        .bind(&user.bio)
        .bind(&user.banner_color)
        .bind(&user.banner_url)
        .bind(user.karma)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_user_conflict)?;

        Ok(())
    }

    /// Denormalized copies are renamed before the `users` row is written.
    /// A vote cast locks its target and then the author's `users` row, so
    /// taking the locks in that same order keeps the two from deadlocking.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update_profile(&self, user: &User, previous_username: &str) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        if user.username != previous_username {
            for statement in RENAME_STATEMENTS {
                sqlx::query(statement)
                    .bind(user.id.into_inner())
                    .bind(&user.username)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
        }

        let result = sqlx::query(
            r"
            UPDATE users
            SET username = $2, display_name = $3, avatar = $4, bio = $5,
                banner_color = $6, banner_url = $7, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.avatar)
        .bind(&user.bio)
        .bind(&user.banner_color)
        .bind(&user.banner_url)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::UsernameTaken
            } else {
                map_db_error(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(user.id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }

        Ok(())
    }
}
