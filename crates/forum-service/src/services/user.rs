//! User service
//!
//! Account settings, profiles, search and the follow graph.

use forum_cache::{CachedIdentity, PubSubChannel};
use forum_common::verify_password;
use forum_core::events::UserUpdatedEvent;
use forum_core::{Actor, DomainError, DomainEvent, Notification, Snowflake, User};
use tracing::{info, instrument};

use crate::dto::{
    ChangePasswordRequest, CurrentUserResponse, FollowResponse, MessageResponse, Page,
    ProfileResponse, ProfileUserResponse, UpdateProfileRequest, UserResponse, UserSummaryResponse,
};

use super::comment::comment_views;
use super::context::ServiceContext;
use super::custom_feed::feed_views;
use super::error::{ServiceError, ServiceResult};
use super::post::{post_views, PostService};
use super::{events, notification};

pub const SEARCH_LIMIT: i64 = 10;
pub const PROFILE_ITEM_LIMIT: i64 = 25;
pub const FOLLOW_LIST_LIMIT: i64 = 100;
pub const PROFILE_FEED_LIMIT: i64 = 10;

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self.find(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    /// Username or display name substring match; a blank query returns nothing
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> ServiceResult<Vec<UserResponse>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.ctx.user_repo().search(query, SEARCH_LIMIT).await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: Snowflake,
        request: ChangePasswordRequest,
    ) -> ServiceResult<MessageResponse> {
        let user = self.find(user_id).await?;

        if !user.email.eq_ignore_ascii_case(request.email.trim()) {
            return Err(ServiceError::validation("Email does not match your account"));
        }

        let current_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| ServiceError::internal("account has no password hash"))?;
        if !verify_password(&request.current_password, &current_hash)? {
            return Err(ServiceError::validation("Current password is incorrect"));
        }

        let new_hash = self.ctx.password_service().hash(&request.new_password)?;
        self.ctx.user_repo().update_password(user.id, &new_hash).await?;

        info!(user_id = %user.id, "Password changed");

        Ok(MessageResponse::new("Password updated successfully"))
    }

    /// A rename also rewrites the username copies held on the user's posts,
    /// comments, communities, feeds and sent notifications
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let mut user = self.find(user_id).await?;
        let previous_username = user.username.clone();

        if let Some(raw) = request.username.as_deref() {
            let username = User::normalize_username(raw)?;
            if username != user.username {
                if self.ctx.user_repo().username_exists(&username).await? {
                    return Err(DomainError::UsernameTaken.into());
                }
                // An untouched display name follows the rename
                if user.display_name == user.username {
                    user.display_name.clone_from(&username);
                }
                user.username = username;
            }
        }
        if let Some(display_name) = request.display_name.as_deref() {
            user.set_display_name(display_name)?;
        }
        if let Some(bio) = request.bio.as_deref() {
            user.set_bio(bio)?;
        }
        if let Some(color) = request.banner_color {
            user.banner_color = color.trim().to_string();
        }
        if let Some(url) = request.banner_url {
            user.banner_url = url.trim().to_string();
        }
        if let Some(avatar) = request.avatar {
            let avatar = avatar.trim();
            user.avatar = (!avatar.is_empty()).then(|| avatar.to_string());
        }

        self.ctx
            .user_repo()
            .update_profile(&user, &previous_username)
            .await?;
        self.ctx.identity_cache().invalidate(user.id);

        info!(
            user_id = %user.id,
            renamed = user.username != previous_username,
            "Profile updated"
        );

        events::publish(
            self.ctx,
            PubSubChannel::user(user.id),
            DomainEvent::UserUpdated(UserUpdatedEvent::new(user.id, user.username.clone())),
        );

        Ok(CurrentUserResponse::from(&user))
    }

    #[instrument(skip(self))]
    pub async fn get_profile(
        &self,
        username: &str,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<ProfileResponse> {
        let user = self.find_by_username(username).await?;
        let own_profile = viewer == Some(user.id);

        let (follower_count, following_count) = self.ctx.follow_repo().counts(user.id).await?;

        let posts = PostService::new(self.ctx)
            .list_by_author(user.id, viewer, Page::new(None, Some(PROFILE_ITEM_LIMIT)))
            .await?;

        let comments = self
            .ctx
            .comment_repo()
            .list_by_author(user.id, PROFILE_ITEM_LIMIT)
            .await?;
        let comments = comment_views(self.ctx, viewer, &comments).await?;

        let followers = self.ctx.follow_repo().followers(user.id, FOLLOW_LIST_LIMIT).await?;
        let following = self.ctx.follow_repo().following(user.id, FOLLOW_LIST_LIMIT).await?;

        let feeds = self
            .ctx
            .custom_feed_repo()
            .list_public_by_creator(user.id, PROFILE_FEED_LIMIT)
            .await?;
        let custom_feeds = feed_views(self.ctx, &feeds).await?;

        let is_following = match viewer {
            Some(viewer) if !own_profile => {
                self.ctx.follow_repo().is_following(viewer, user.id).await?
            }
            _ => false,
        };

        let saved_posts = if own_profile {
            let saved = self
                .ctx
                .post_repo()
                .list_saved(user.id, PROFILE_ITEM_LIMIT)
                .await?;
            post_views(self.ctx, viewer, &saved).await?
        } else {
            Vec::new()
        };

        Ok(ProfileResponse {
            user: ProfileUserResponse {
                user: UserResponse::from(&user),
                follower_count,
                following_count,
            },
            posts,
            comments,
            followers: followers.iter().map(UserSummaryResponse::from).collect(),
            following: following.iter().map(UserSummaryResponse::from).collect(),
            custom_feeds,
            is_following,
            saved_posts,
        })
    }

    /// Follow, or unfollow when already following
    #[instrument(skip(self, follower), fields(follower_id = %follower.user_id))]
    pub async fn toggle_follow(
        &self,
        follower: &CachedIdentity,
        username: &str,
    ) -> ServiceResult<FollowResponse> {
        let target = self.find_by_username(username).await?;
        if target.id == follower.user_id {
            return Err(DomainError::CannotFollowSelf.into());
        }

        let follows = self.ctx.follow_repo();
        if follows.is_following(follower.user_id, target.id).await? {
            follows.unfollow(follower.user_id, target.id).await?;
            info!(followee_id = %target.id, "Unfollowed user");
            return Ok(FollowResponse {
                following: false,
                message: format!("Unfollowed {}", target.username),
            });
        }

        if follows.follow(follower.user_id, target.id).await? {
            notification::dispatch(
                self.ctx,
                Notification::follow(
                    self.ctx.generate_id(),
                    target.id,
                    Actor {
                        id: follower.user_id,
                        username: &follower.username,
                    },
                ),
            );
        }

        info!(followee_id = %target.id, "Followed user");

        Ok(FollowResponse {
            following: true,
            message: format!("Following {}", target.username),
        })
    }

    #[instrument(skip(self))]
    pub async fn followers(&self, username: &str) -> ServiceResult<Vec<UserSummaryResponse>> {
        let user = self.find_by_username(username).await?;
        let followers = self.ctx.follow_repo().followers(user.id, FOLLOW_LIST_LIMIT).await?;
        Ok(followers.iter().map(UserSummaryResponse::from).collect())
    }

    async fn find(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<User> {
        let username = username.trim().to_lowercase();
        self.ctx
            .user_repo()
            .find_by_username(&username)
            .await?
            .ok_or_else(|| DomainError::UsernameNotFound(username).into())
    }
}
