//! User handlers
//!
//! Current account, profiles, search, and follows.

use axum::{
    extract::{Query, State},
    Json,
};
use forum_service::dto::{
    ChangePasswordRequest, CurrentUserResponse, FollowResponse, MessageResponse, ProfileResponse,
    SearchQuery, UpdateProfileRequest, UserResponse, UserSummaryResponse,
};
use forum_service::UserService;

use crate::extractors::{AuthUser, OptionalAuthUser, UsernamePath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_current_user(auth.user_id()).await?))
}

/// Update username, display name, bio, banner or avatar
///
/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.update_profile(auth.user_id(), request).await?))
}

/// PUT /users/@me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.change_password(auth.user_id(), request).await?))
}

/// GET /users/search?q=
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.search(&query.q).await?))
}

/// GET /users/{username}/profile
pub async fn get_profile(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    path: UsernamePath,
) -> ApiResult<Json<ProfileResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_profile(&path.username, viewer.user_id()).await?))
}

/// Follow, or unfollow when already following
///
/// POST /users/{username}/follow
pub async fn toggle_follow(
    State(state): State<AppState>,
    auth: AuthUser,
    path: UsernamePath,
) -> ApiResult<Json<FollowResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.toggle_follow(&auth.identity, &path.username).await?))
}

/// GET /users/{username}/followers
pub async fn get_followers(
    State(state): State<AppState>,
    path: UsernamePath,
) -> ApiResult<Json<Vec<UserSummaryResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.followers(&path.username).await?))
}
