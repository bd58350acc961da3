//! Custom feed handlers
//!
//! Everything but the public profile listing requires a signed-in caller;
//! private feeds are owner-only.

use axum::{extract::State, Json};
use forum_service::dto::{
    AddFeedCommunityRequest, CreateCustomFeedRequest, CustomFeedResponse, FavoriteResponse,
    MessageResponse, PostResponse, UpdateCustomFeedRequest,
};
use forum_service::CustomFeedService;

use crate::extractors::{
    AuthUser, FeedCommunityPath, FeedIdPath, JsonBody, UsernamePath, ValidatedJson,
};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// The caller's feeds, favorites first
///
/// GET /custom-feeds
pub async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<CustomFeedResponse>>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(service.list_own(auth.user_id()).await?))
}

/// POST /custom-feeds
pub async fn create_feed(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCustomFeedRequest>,
) -> ApiResult<Created<Json<CustomFeedResponse>>> {
    let service = CustomFeedService::new(state.service_context());
    let feed = service.create(&auth.identity, request).await?;
    Ok(Created(Json(feed)))
}

/// Public feeds shown on a user's profile
///
/// GET /custom-feeds/user/{username}
pub async fn list_public(
    State(state): State<AppState>,
    path: UsernamePath,
) -> ApiResult<Json<Vec<CustomFeedResponse>>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(service.list_public(&path.username).await?))
}

/// GET /custom-feeds/{feed_id}
pub async fn get_feed(
    State(state): State<AppState>,
    auth: AuthUser,
    path: FeedIdPath,
) -> ApiResult<Json<CustomFeedResponse>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(service.get(auth.user_id(), path.feed_id()?).await?))
}

/// PUT /custom-feeds/{feed_id}
pub async fn update_feed(
    State(state): State<AppState>,
    auth: AuthUser,
    path: FeedIdPath,
    ValidatedJson(request): ValidatedJson<UpdateCustomFeedRequest>,
) -> ApiResult<Json<CustomFeedResponse>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(
        service
            .update(auth.user_id(), path.feed_id()?, request)
            .await?,
    ))
}

/// DELETE /custom-feeds/{feed_id}
pub async fn delete_feed(
    State(state): State<AppState>,
    auth: AuthUser,
    path: FeedIdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(service.delete(auth.user_id(), path.feed_id()?).await?))
}

/// GET /custom-feeds/{feed_id}/posts
pub async fn feed_posts(
    State(state): State<AppState>,
    auth: AuthUser,
    path: FeedIdPath,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(service.posts(auth.user_id(), path.feed_id()?).await?))
}

/// PUT /custom-feeds/{feed_id}/favorite
pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    path: FeedIdPath,
) -> ApiResult<Json<FavoriteResponse>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(
        service
            .toggle_favorite(auth.user_id(), path.feed_id()?)
            .await?,
    ))
}

/// POST /custom-feeds/{feed_id}/communities
pub async fn add_community(
    State(state): State<AppState>,
    auth: AuthUser,
    path: FeedIdPath,
    JsonBody(request): JsonBody<AddFeedCommunityRequest>,
) -> ApiResult<Json<CustomFeedResponse>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(
        service
            .add_community(auth.user_id(), path.feed_id()?, request)
            .await?,
    ))
}

/// DELETE /custom-feeds/{feed_id}/communities/{community_id}
pub async fn remove_community(
    State(state): State<AppState>,
    auth: AuthUser,
    path: FeedCommunityPath,
) -> ApiResult<Json<CustomFeedResponse>> {
    let service = CustomFeedService::new(state.service_context());
    Ok(Json(
        service
            .remove_community(auth.user_id(), path.feed_id()?, path.community_id()?)
            .await?,
    ))
}
