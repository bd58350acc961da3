//! Community service

use forum_cache::CachedIdentity;
use forum_core::{Community, DomainError, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::{CommunityResponse, CreateCommunityRequest, MembershipResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub const DEFAULT_POPULAR_LIMIT: i64 = 25;
pub const SEARCH_LIMIT: i64 = 10;

pub struct CommunityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommunityService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The creator becomes the first member
    #[instrument(skip(self, creator, request), fields(creator_id = %creator.user_id))]
    pub async fn create(
        &self,
        creator: &CachedIdentity,
        request: CreateCommunityRequest,
    ) -> ServiceResult<CommunityResponse> {
        let name = Community::normalize_name(&request.name)?;
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(ServiceError::validation("Title is required"));
        }

        if self.ctx.community_repo().find_by_name(&name).await?.is_some() {
            return Err(DomainError::CommunityNameTaken.into());
        }

        let mut community = Community::new(
            self.ctx.generate_id(),
            name,
            title,
            creator.user_id,
            creator.username.clone(),
        );
        if let Some(description) = request.description {
            community.description = description.trim().to_string();
        }
        if let Some(category) = request.category.filter(|c| !c.trim().is_empty()) {
            community.category = category.trim().to_string();
        }
        community.rules = request
            .rules
            .into_iter()
            .map(|rule| rule.trim().to_string())
            .filter(|rule| !rule.is_empty())
            .collect();

        self.ctx.community_repo().create(&community).await?;

        info!(community_id = %community.id, name = %community.name, "Community created");

        let mut view = CommunityResponse::from(&community);
        view.is_joined = Some(true);
        Ok(view)
    }

    /// `isJoined` is only reported to signed-in viewers
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str, viewer: Option<Snowflake>) -> ServiceResult<CommunityResponse> {
        let community = self.find_by_name(name).await?;

        let mut view = CommunityResponse::from(&community);
        if let Some(viewer) = viewer {
            view.is_joined = Some(
                self.ctx
                    .community_repo()
                    .is_member(community.id, viewer)
                    .await?,
            );
        }
        Ok(view)
    }

    /// Largest communities first
    #[instrument(skip(self))]
    pub async fn list_popular(&self, limit: Option<i64>) -> ServiceResult<Vec<CommunityResponse>> {
        let limit = limit.unwrap_or(DEFAULT_POPULAR_LIMIT).clamp(1, 100);
        let communities = self.ctx.community_repo().list_popular(limit).await?;
        Ok(communities.iter().map(CommunityResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> ServiceResult<Vec<CommunityResponse>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let communities = self
            .ctx
            .community_repo()
            .search(&query.to_lowercase(), SEARCH_LIMIT)
            .await?;
        Ok(communities.iter().map(CommunityResponse::from).collect())
    }

    /// Joining twice is a no-op
    #[instrument(skip(self))]
    pub async fn join(&self, user_id: Snowflake, name: &str) -> ServiceResult<MembershipResponse> {
        let community = self.find_by_name(name).await?;
        let joined = self.ctx.community_repo().join(community.id, user_id).await?;
        debug!(community_id = %community.id, newly_joined = joined, "Join processed");

        self.membership(community.id, true).await
    }

    #[instrument(skip(self))]
    pub async fn leave(&self, user_id: Snowflake, name: &str) -> ServiceResult<MembershipResponse> {
        let community = self.find_by_name(name).await?;
        if community.is_creator(user_id) {
            return Err(DomainError::CreatorCannotLeave.into());
        }

        let left = self.ctx.community_repo().leave(community.id, user_id).await?;
        debug!(community_id = %community.id, was_member = left, "Leave processed");

        self.membership(community.id, false).await
    }

    #[instrument(skip(self))]
    pub async fn list_joined(&self, user_id: Snowflake) -> ServiceResult<Vec<CommunityResponse>> {
        let communities = self.ctx.community_repo().list_joined(user_id).await?;
        Ok(communities
            .iter()
            .map(|c| {
                let mut view = CommunityResponse::from(c);
                view.is_joined = Some(true);
                view
            })
            .collect())
    }

    async fn membership(&self, community_id: Snowflake, joined: bool) -> ServiceResult<MembershipResponse> {
        let community = self
            .ctx
            .community_repo()
            .find_by_id(community_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Community", community_id.to_string()))?;

        Ok(MembershipResponse {
            joined,
            member_count: community.member_count,
        })
    }

    async fn find_by_name(&self, name: &str) -> ServiceResult<Community> {
        let name = name.trim().to_lowercase();
        self.ctx
            .community_repo()
            .find_by_name(&name)
            .await?
            .ok_or_else(|| DomainError::CommunityNotFound(name).into())
    }
}
