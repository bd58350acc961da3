//! Service context - dependency container for services
//!
//! Holds the repositories, cache stores, and auth primitives every service
//! borrows. Cloning is cheap; background tasks take their own clone.

use std::sync::Arc;

use forum_cache::{Publisher, RefreshTokenStore, SharedRedisPool, UserIdentityCache};
use forum_common::auth::{JwtService, PasswordService};
use forum_core::traits::{
    ChatRepository, CommentRepository, CommunityRepository, CustomFeedRepository,
    FollowRepository, NotificationRepository, PostRepository, UserRepository, VoteRepository,
};
use forum_core::{Snowflake, SnowflakeGenerator};
use forum_db::PgPool;

use super::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    redis_pool: SharedRedisPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    community_repo: Arc<dyn CommunityRepository>,
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    follow_repo: Arc<dyn FollowRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    custom_feed_repo: Arc<dyn CustomFeedRepository>,
    chat_repo: Arc<dyn ChatRepository>,

    // Cache
    refresh_token_store: RefreshTokenStore,
    publisher: Publisher,
    identity_cache: Arc<UserIdentityCache>,

    // Auth and ids
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        user_repo: Arc<dyn UserRepository>,
        community_repo: Arc<dyn CommunityRepository>,
        post_repo: Arc<dyn PostRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        vote_repo: Arc<dyn VoteRepository>,
        follow_repo: Arc<dyn FollowRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        custom_feed_repo: Arc<dyn CustomFeedRepository>,
        chat_repo: Arc<dyn ChatRepository>,
        identity_cache: Arc<UserIdentityCache>,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        let inner_pool = (*redis_pool).clone();
        let refresh_ttl = jwt_service.refresh_token_expiry().max(1) as u64;
        let refresh_token_store = RefreshTokenStore::with_ttl(inner_pool.clone(), refresh_ttl);
        let publisher = Publisher::new(inner_pool);

        Self {
            pool,
            redis_pool,
            user_repo,
            community_repo,
            post_repo,
            comment_repo,
            vote_repo,
            follow_repo,
            notification_repo,
            custom_feed_repo,
            chat_repo,
            refresh_token_store,
            publisher,
            identity_cache,
            jwt_service,
            password_service: PasswordService::new(),
            snowflake_generator,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn community_repo(&self) -> &dyn CommunityRepository {
        self.community_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    pub fn follow_repo(&self) -> &dyn FollowRepository {
        self.follow_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn custom_feed_repo(&self) -> &dyn CustomFeedRepository {
        self.custom_feed_repo.as_ref()
    }

    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    // === Cache ===

    pub fn refresh_token_store(&self) -> &RefreshTokenStore {
        &self.refresh_token_store
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn identity_cache(&self) -> &UserIdentityCache {
        self.identity_cache.as_ref()
    }

    // === Auth and ids ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &"SharedRedisPool")
            .field("repositories", &"...")
            .field("identity_cache_len", &self.identity_cache.len())
            .finish()
    }
}

/// Builder for [`ServiceContext`]; every dependency is required
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    community_repo: Option<Arc<dyn CommunityRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    follow_repo: Option<Arc<dyn FollowRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    custom_feed_repo: Option<Arc<dyn CustomFeedRepository>>,
    chat_repo: Option<Arc<dyn ChatRepository>>,
    identity_cache: Option<Arc<UserIdentityCache>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn community_repo(mut self, repo: Arc<dyn CommunityRepository>) -> Self {
        self.community_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn VoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn follow_repo(mut self, repo: Arc<dyn FollowRepository>) -> Self {
        self.follow_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn custom_feed_repo(mut self, repo: Arc<dyn CustomFeedRepository>) -> Self {
        self.custom_feed_repo = Some(repo);
        self
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn identity_cache(mut self, cache: Arc<UserIdentityCache>) -> Self {
        self.identity_cache = Some(cache);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// # Errors
    /// Returns `ServiceError::Validation` naming the first missing dependency
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext::new(
            required(self.pool, "pool")?,
            required(self.redis_pool, "redis_pool")?,
            required(self.user_repo, "user_repo")?,
            required(self.community_repo, "community_repo")?,
            required(self.post_repo, "post_repo")?,
            required(self.comment_repo, "comment_repo")?,
            required(self.vote_repo, "vote_repo")?,
            required(self.follow_repo, "follow_repo")?,
            required(self.notification_repo, "notification_repo")?,
            required(self.custom_feed_repo, "custom_feed_repo")?,
            required(self.chat_repo, "chat_repo")?,
            required(self.identity_cache, "identity_cache")?,
            required(self.jwt_service, "jwt_service")?,
            required(self.snowflake_generator, "snowflake_generator")?,
        ))
    }
}
