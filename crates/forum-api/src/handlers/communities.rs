//! Community handlers

use axum::{
    extract::{Query, State},
    Json,
};
use forum_service::dto::{
    CommunityResponse, CreateCommunityRequest, MembershipResponse, PostResponse, SearchQuery,
};
use forum_service::{CommunityService, PostService};

use crate::extractors::{
    AuthUser, CommunityNamePath, LimitParams, OptionalAuthUser, Pagination, ValidatedJson,
};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Largest communities first
///
/// GET /communities?limit=
pub async fn list_popular(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> ApiResult<Json<Vec<CommunityResponse>>> {
    let service = CommunityService::new(state.service_context());
    Ok(Json(service.list_popular(params.limit).await?))
}

/// POST /communities
pub async fn create_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCommunityRequest>,
) -> ApiResult<Created<Json<CommunityResponse>>> {
    let service = CommunityService::new(state.service_context());
    let community = service.create(&auth.identity, request).await?;
    Ok(Created(Json(community)))
}

/// GET /communities/search?q=
pub async fn search_communities(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<CommunityResponse>>> {
    let service = CommunityService::new(state.service_context());
    Ok(Json(service.search(&query.q).await?))
}

/// GET /communities/joined
pub async fn list_joined(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<CommunityResponse>>> {
    let service = CommunityService::new(state.service_context());
    Ok(Json(service.list_joined(auth.user_id()).await?))
}

/// GET /communities/{name}
pub async fn get_community(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    path: CommunityNamePath,
) -> ApiResult<Json<CommunityResponse>> {
    let service = CommunityService::new(state.service_context());
    Ok(Json(service.get(&path.name, viewer.user_id()).await?))
}

/// POST /communities/{name}/join
pub async fn join_community(
    State(state): State<AppState>,
    auth: AuthUser,
    path: CommunityNamePath,
) -> ApiResult<Json<MembershipResponse>> {
    let service = CommunityService::new(state.service_context());
    Ok(Json(service.join(auth.user_id(), &path.name).await?))
}

/// DELETE /communities/{name}/join
pub async fn leave_community(
    State(state): State<AppState>,
    auth: AuthUser,
    path: CommunityNamePath,
) -> ApiResult<Json<MembershipResponse>> {
    let service = CommunityService::new(state.service_context());
    Ok(Json(service.leave(auth.user_id(), &path.name).await?))
}

/// GET /communities/{name}/posts?before=&limit=
pub async fn list_community_posts(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    path: CommunityNamePath,
    Pagination(page): Pagination,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = PostService::new(state.service_context());
    Ok(Json(
        service
            .list_by_community(&path.name, viewer.user_id(), page)
            .await?,
    ))
}
