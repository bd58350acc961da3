//! Post handlers

use axum::{
    extract::{Query, State},
    Json,
};
use forum_service::dto::{
    CreatePostRequest, MessageResponse, Page, PostResponse, SaveResponse, UpdatePostRequest,
};
use forum_service::PostService;

use crate::extractors::{
    AuthUser, LimitParams, OptionalAuthUser, Pagination, PostIdPath, ValidatedJson,
};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Every community, newest first
///
/// GET /posts?before=&limit=
pub async fn list_posts(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.list(viewer.user_id(), page).await?))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let post = service.create(&auth.identity, request).await?;
    Ok(Created(Json(post)))
}

/// GET /posts/saved?limit=
pub async fn list_saved(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<LimitParams>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let limit = Page::new(None, params.limit).limit;
    Ok(Json(service.list_saved(auth.user_id(), limit).await?))
}

/// GET /posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    path: PostIdPath,
) -> ApiResult<Json<PostResponse>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.get(path.post_id()?, viewer.user_id()).await?))
}

/// PATCH /posts/{post_id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    path: PostIdPath,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let service = PostService::new(state.service_context());
    Ok(Json(
        service
            .update(auth.user_id(), path.post_id()?, request)
            .await?,
    ))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    path: PostIdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.delete(auth.user_id(), path.post_id()?).await?))
}

/// Save, or unsave when already saved
///
/// POST /posts/{post_id}/save
pub async fn toggle_save(
    State(state): State<AppState>,
    auth: AuthUser,
    path: PostIdPath,
) -> ApiResult<Json<SaveResponse>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.toggle_save(auth.user_id(), path.post_id()?).await?))
}
