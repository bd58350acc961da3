//! Custom feed service
//!
//! A custom feed is a named, user-curated set of communities. Private feeds
//! are visible to their creator only; every mutation is owner-only.

use std::collections::HashSet;

use forum_cache::CachedIdentity;
use forum_core::traits::PostQuery;
use forum_core::{CustomFeed, DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    AddFeedCommunityRequest, CreateCustomFeedRequest, CustomFeedResponse, FavoriteResponse,
    MessageResponse, PostResponse, UpdateCustomFeedRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::post::post_views;

pub const FEED_POST_LIMIT: i64 = 50;
pub const PUBLIC_FEED_LIMIT: i64 = 100;

/// Resolve member communities for a batch of feeds with one lookup
pub(crate) async fn feed_views(
    ctx: &ServiceContext,
    feeds: &[CustomFeed],
) -> ServiceResult<Vec<CustomFeedResponse>> {
    let ids: Vec<Snowflake> = feeds
        .iter()
        .flat_map(|f| f.community_ids.iter().copied())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let communities = if ids.is_empty() {
        Vec::new()
    } else {
        ctx.community_repo().find_by_ids(&ids).await?
    };

    Ok(feeds
        .iter()
        .map(|feed| CustomFeedResponse::new(feed, &communities))
        .collect())
}

pub struct CustomFeedService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CustomFeedService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's feeds, favorites first
    #[instrument(skip(self))]
    pub async fn list_own(&self, user_id: Snowflake) -> ServiceResult<Vec<CustomFeedResponse>> {
        let feeds = self.ctx.custom_feed_repo().list_by_creator(user_id).await?;
        feed_views(self.ctx, &feeds).await
    }

    #[instrument(skip(self))]
    pub async fn list_public(&self, username: &str) -> ServiceResult<Vec<CustomFeedResponse>> {
        let username = username.trim().to_lowercase();
        let user = self
            .ctx
            .user_repo()
            .find_by_username(&username)
            .await?
            .ok_or(DomainError::UsernameNotFound(username))?;

        let feeds = self
            .ctx
            .custom_feed_repo()
            .list_public_by_creator(user.id, PUBLIC_FEED_LIMIT)
            .await?;
        feed_views(self.ctx, &feeds).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Snowflake, feed_id: Snowflake) -> ServiceResult<CustomFeedResponse> {
        let feed = self.find(feed_id).await?;
        feed.ensure_visible_to(user_id)?;
        self.view(&feed).await
    }

    /// Newest posts from the feed's communities
    #[instrument(skip(self))]
    pub async fn posts(&self, user_id: Snowflake, feed_id: Snowflake) -> ServiceResult<Vec<PostResponse>> {
        let feed = self.find(feed_id).await?;
        feed.ensure_visible_to(user_id)?;

        if feed.community_ids.is_empty() {
            return Ok(Vec::new());
        }

        let posts = self
            .ctx
            .post_repo()
            .list(PostQuery {
                community_ids: Some(feed.community_ids.clone()),
                limit: FEED_POST_LIMIT,
                ..PostQuery::default()
            })
            .await?;
        post_views(self.ctx, Some(user_id), &posts).await
    }

    #[instrument(skip(self, creator, request), fields(creator_id = %creator.user_id))]
    pub async fn create(
        &self,
        creator: &CachedIdentity,
        request: CreateCustomFeedRequest,
    ) -> ServiceResult<CustomFeedResponse> {
        let name = Self::clean_name(&request.name)?;
        if self
            .ctx
            .custom_feed_repo()
            .name_exists(creator.user_id, &name, None)
            .await?
        {
            return Err(DomainError::CustomFeedNameTaken.into());
        }

        let mut feed = CustomFeed::new(
            self.ctx.generate_id(),
            name,
            creator.user_id,
            creator.username.clone(),
        );
        if let Some(description) = request.description {
            feed.description = description.trim().to_string();
        }
        feed.is_private = request.is_private;
        if let Some(show) = request.show_on_profile {
            feed.show_on_profile = show;
        }

        self.ctx.custom_feed_repo().create(&feed).await?;

        info!(feed_id = %feed.id, "Custom feed created");

        Ok(CustomFeedResponse::new(&feed, &[]))
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        user_id: Snowflake,
        feed_id: Snowflake,
        request: UpdateCustomFeedRequest,
    ) -> ServiceResult<CustomFeedResponse> {
        let mut feed = self.find(feed_id).await?;
        feed.ensure_owner(user_id)?;

        if let Some(raw) = request.name.as_deref() {
            let name = Self::clean_name(raw)?;
            if !name.eq_ignore_ascii_case(&feed.name)
                && self
                    .ctx
                    .custom_feed_repo()
                    .name_exists(user_id, &name, Some(feed.id))
                    .await?
            {
                return Err(DomainError::CustomFeedNameTaken.into());
            }
            feed.name = name;
        }
        if let Some(description) = request.description {
            feed.description = description.trim().to_string();
        }
        if let Some(is_private) = request.is_private {
            feed.is_private = is_private;
        }
        if let Some(show) = request.show_on_profile {
            feed.show_on_profile = show;
        }

        self.ctx.custom_feed_repo().update(&feed).await?;

        info!(feed_id = %feed.id, "Custom feed updated");

        self.view(&feed).await
    }

    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, user_id: Snowflake, feed_id: Snowflake) -> ServiceResult<FavoriteResponse> {
        let feed = self.find(feed_id).await?;
        feed.ensure_owner(user_id)?;

        let is_favorite = self.ctx.custom_feed_repo().toggle_favorite(feed.id).await?;

        Ok(FavoriteResponse { is_favorite })
    }

    /// Only communities the owner has joined can be added
    #[instrument(skip(self, request))]
    pub async fn add_community(
        &self,
        user_id: Snowflake,
        feed_id: Snowflake,
        request: AddFeedCommunityRequest,
    ) -> ServiceResult<CustomFeedResponse> {
        let mut feed = self.find(feed_id).await?;
        feed.ensure_owner(user_id)?;

        let community = self
            .ctx
            .community_repo()
            .find_by_id(request.community_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Community", request.community_id.to_string()))?;

        if !self
            .ctx
            .community_repo()
            .is_member(community.id, user_id)
            .await?
        {
            return Err(DomainError::NotCommunityMember.into());
        }

        if feed.contains(community.id)
            || !self
                .ctx
                .custom_feed_repo()
                .add_community(feed.id, community.id)
                .await?
        {
            return Err(DomainError::CommunityAlreadyInFeed.into());
        }
        feed.community_ids.push(community.id);

        info!(feed_id = %feed.id, community_id = %community.id, "Community added to feed");

        self.view(&feed).await
    }

    #[instrument(skip(self))]
    pub async fn remove_community(
        &self,
        user_id: Snowflake,
        feed_id: Snowflake,
        community_id: Snowflake,
    ) -> ServiceResult<CustomFeedResponse> {
        let mut feed = self.find(feed_id).await?;
        feed.ensure_owner(user_id)?;

        if self
            .ctx
            .custom_feed_repo()
            .remove_community(feed.id, community_id)
            .await?
        {
            info!(feed_id = %feed.id, community_id = %community_id, "Community removed from feed");
        }
        feed.community_ids.retain(|id| *id != community_id);

        self.view(&feed).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Snowflake, feed_id: Snowflake) -> ServiceResult<MessageResponse> {
        let feed = self.find(feed_id).await?;
        feed.ensure_owner(user_id)?;

        self.ctx.custom_feed_repo().delete(feed.id).await?;

        info!(feed_id = %feed.id, "Custom feed deleted");

        Ok(MessageResponse::new("Custom feed deleted"))
    }

    async fn view(&self, feed: &CustomFeed) -> ServiceResult<CustomFeedResponse> {
        let mut views = feed_views(self.ctx, std::slice::from_ref(feed)).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::internal("feed view missing"))
    }

    async fn find(&self, feed_id: Snowflake) -> ServiceResult<CustomFeed> {
        self.ctx
            .custom_feed_repo()
            .find_by_id(feed_id)
            .await?
            .ok_or_else(|| DomainError::CustomFeedNotFound(feed_id).into())
    }

    fn clean_name(raw: &str) -> ServiceResult<String> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("Name is required"));
        }
        Ok(name.to_string())
    }
}
