//! Vote handlers
//!
//! Both targets share one body, `{"direction":"up"|"down"}`, and answer
//! with the committed counters.

use axum::{extract::State, Json};
use forum_core::TargetType;
use forum_service::dto::{VoteRequest, VoteResponse};
use forum_service::VoteService;

use crate::extractors::{AuthUser, CommentIdPath, JsonBody, PostIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// POST /posts/{post_id}/vote
pub async fn vote_post(
    State(state): State<AppState>,
    auth: AuthUser,
    path: PostIdPath,
    JsonBody(request): JsonBody<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let service = VoteService::new(state.service_context());
    let response = service
        .cast(&auth.identity, path.post_id()?, TargetType::Post, request)
        .await?;
    Ok(Json(response))
}

/// POST /comments/{comment_id}/vote
pub async fn vote_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    path: CommentIdPath,
    JsonBody(request): JsonBody<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let service = VoteService::new(state.service_context());
    let response = service
        .cast(&auth.identity, path.comment_id()?, TargetType::Comment, request)
        .await?;
    Ok(Json(response))
}
