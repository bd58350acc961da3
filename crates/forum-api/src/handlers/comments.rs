//! Comment handlers

use axum::{extract::State, Json};
use forum_service::dto::{CommentResponse, CreateCommentRequest, MessageResponse, UpdateCommentRequest};
use forum_service::CommentService;

use crate::extractors::{AuthUser, CommentIdPath, OptionalAuthUser, PostIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Flat list, oldest first; clients build the tree from `parentId`
///
/// GET /posts/{post_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    path: PostIdPath,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    Ok(Json(service.list(path.post_id()?, viewer.user_id()).await?))
}

/// POST /posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    path: PostIdPath,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let comment = service
        .create(&auth.identity, path.post_id()?, request)
        .await?;
    Ok(Created(Json(comment)))
}

/// PATCH /comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    path: CommentIdPath,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    Ok(Json(
        service
            .update(auth.user_id(), path.comment_id()?, request)
            .await?,
    ))
}

/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    path: CommentIdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = CommentService::new(state.service_context());
    Ok(Json(service.delete(auth.user_id(), path.comment_id()?).await?))
}
