//! Post service
//!
//! Creating, listing, editing and deleting posts, and the saved-posts list.
//! Every listing attaches the caller's votes and saved flags with one batch
//! lookup per page.

use std::collections::HashSet;

use forum_cache::{CachedIdentity, PubSubChannel};
use forum_core::events::{PostCreatedEvent, PostDeletedEvent};
use forum_core::traits::PostQuery;
use forum_core::{DomainError, DomainEvent, Post, Snowflake, TargetType};
use tracing::{info, instrument};

use crate::dto::{CreatePostRequest, MessageResponse, Page, PostResponse, SaveResponse, UpdatePostRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::events;

/// Decorate posts with the viewer's vote and saved state
pub(crate) async fn post_views(
    ctx: &ServiceContext,
    viewer: Option<Snowflake>,
    posts: &[Post],
) -> ServiceResult<Vec<PostResponse>> {
    let Some(viewer) = viewer.filter(|_| !posts.is_empty()) else {
        return Ok(posts.iter().map(PostResponse::from).collect());
    };

    let ids: Vec<Snowflake> = posts.iter().map(|p| p.id).collect();
    let votes = ctx
        .vote_repo()
        .find_for_targets(viewer, &ids, TargetType::Post)
        .await?;
    let saved: HashSet<Snowflake> = ctx
        .post_repo()
        .saved_among(viewer, &ids)
        .await?
        .into_iter()
        .collect();

    Ok(posts
        .iter()
        .map(|post| {
            PostResponse::from(post)
                .with_user_vote(votes.get(&post.id).copied())
                .with_saved(saved.contains(&post.id))
        })
        .collect())
}

pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// New posts start at `1/0` (the author's implicit upvote, no ledger row)
    #[instrument(skip(self, author, request), fields(author_id = %author.user_id))]
    pub async fn create(
        &self,
        author: &CachedIdentity,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(ServiceError::validation("Title is required"));
        }

        let community_name = request.community.trim().to_lowercase();
        let community = self
            .ctx
            .community_repo()
            .find_by_name(&community_name)
            .await?
            .ok_or(DomainError::CommunityNotFound(community_name))?;

        let post = Post::new(
            self.ctx.generate_id(),
            title,
            request.post_type,
            request.content,
            author.user_id,
            author.username.clone(),
            community.id,
            community.name.clone(),
        );
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, community = %community.name, "Post created");

        events::publish(
            self.ctx,
            PubSubChannel::community(community.id),
            DomainEvent::PostCreated(PostCreatedEvent::new(post.id, community.id, author.user_id)),
        );

        Ok(PostResponse::from(&post))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, post_id: Snowflake, viewer: Option<Snowflake>) -> ServiceResult<PostResponse> {
        let post = self.find(post_id).await?;
        let mut views = post_views(self.ctx, viewer, std::slice::from_ref(&post)).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::internal("post view missing"))
    }

    /// Newest posts across every community
    #[instrument(skip(self))]
    pub async fn list(&self, viewer: Option<Snowflake>, page: Page) -> ServiceResult<Vec<PostResponse>> {
        self.list_where(viewer, PostQuery::default(), page).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_community(
        &self,
        community_name: &str,
        viewer: Option<Snowflake>,
        page: Page,
    ) -> ServiceResult<Vec<PostResponse>> {
        let name = community_name.trim().to_lowercase();
        let community = self
            .ctx
            .community_repo()
            .find_by_name(&name)
            .await?
            .ok_or(DomainError::CommunityNotFound(name))?;

        let query = PostQuery {
            community_ids: Some(vec![community.id]),
            ..PostQuery::default()
        };
        self.list_where(viewer, query, page).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_author(
        &self,
        author_id: Snowflake,
        viewer: Option<Snowflake>,
        page: Page,
    ) -> ServiceResult<Vec<PostResponse>> {
        let query = PostQuery {
            author_id: Some(author_id),
            ..PostQuery::default()
        };
        self.list_where(viewer, query, page).await
    }

    async fn list_where(
        &self,
        viewer: Option<Snowflake>,
        mut query: PostQuery,
        page: Page,
    ) -> ServiceResult<Vec<PostResponse>> {
        query.before = page.before;
        query.limit = page.limit;
        let posts = self.ctx.post_repo().list(query).await?;
        post_views(self.ctx, viewer, &posts).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        user_id: Snowflake,
        post_id: Snowflake,
        request: UpdatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let mut post = self.find(post_id).await?;
        if !post.is_author(user_id) {
            return Err(DomainError::NotAuthor("post").into());
        }

        let title = match request.title.map(|t| t.trim().to_string()) {
            Some(t) if t.is_empty() => return Err(ServiceError::validation("Title cannot be empty")),
            other => other,
        };
        post.edit(title, request.content);
        self.ctx.post_repo().update(&post).await?;

        info!(post_id = %post.id, "Post updated");

        let mut views = post_views(self.ctx, Some(user_id), std::slice::from_ref(&post)).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::internal("post view missing"))
    }

    /// Removes the post, its comments, and every vote on them
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Snowflake, post_id: Snowflake) -> ServiceResult<MessageResponse> {
        let post = self.find(post_id).await?;
        if !post.is_author(user_id) {
            return Err(DomainError::NotAuthor("post").into());
        }

        self.ctx.post_repo().delete(post.id).await?;

        info!(post_id = %post.id, "Post deleted");

        events::publish(
            self.ctx,
            PubSubChannel::post(post.id),
            DomainEvent::PostDeleted(PostDeletedEvent::new(post.id, post.community_id)),
        );

        Ok(MessageResponse::new("Post deleted"))
    }

    #[instrument(skip(self))]
    pub async fn toggle_save(&self, user_id: Snowflake, post_id: Snowflake) -> ServiceResult<SaveResponse> {
        let post = self.find(post_id).await?;
        let saved = self.ctx.post_repo().toggle_saved(user_id, post.id).await?;
        Ok(SaveResponse { saved })
    }

    /// The caller's saved posts, most recently saved first
    #[instrument(skip(self))]
    pub async fn list_saved(&self, user_id: Snowflake, limit: i64) -> ServiceResult<Vec<PostResponse>> {
        let posts = self.ctx.post_repo().list_saved(user_id, limit).await?;
        post_views(self.ctx, Some(user_id), &posts).await
    }

    async fn find(&self, post_id: Snowflake) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(post_id).into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use forum_core::{PostType, VoteDirection};

    use super::*;
    use crate::dto::VoteRequest;
    use crate::services::testing::{context, MemoryStore};
    use crate::services::VoteService;

    fn new_post(title: &str, community: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            post_type: PostType::Text,
            content: "body".to_string(),
            community: community.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_with_author_upvote() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        store.seed_community(10, "rust", &author);

        let service = PostService::new(&ctx);
        let created = service.create(&author, new_post("Hello", "Rust")).await.unwrap();
        assert_eq!(created.vote_count, 1);
        assert_eq!(created.user_vote, None);
        assert_eq!(created.subreddit, "rust");

        let err = service.create(&author, new_post("Hello", "missing")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        let err = service.create(&author, new_post("   ", "rust")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_listing_pages_newest_first_with_votes() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        let viewer = store.seed_user(2, "viewer");
        let community = store.seed_community(10, "rust", &author);
        for id in 100..105 {
            store.seed_post(id, &format!("Post {id}"), &author, &community);
        }

        VoteService::new(&ctx)
            .cast(&viewer, Snowflake::new(103), TargetType::Post, VoteRequest { direction: "up".into() })
            .await
            .unwrap();

        let service = PostService::new(&ctx);
        let first = service
            .list(Some(viewer.user_id), Page::new(None, Some(2)))
            .await
            .unwrap();
        let ids: Vec<i64> = first.iter().map(|p| p.id.into_inner()).collect();
        assert_eq!(ids, vec![104, 103]);
        assert_eq!(first[1].user_vote, Some(VoteDirection::Up));
        assert_eq!(first[1].vote_count, 2);

        let next = service
            .list_by_community("rust", Some(viewer.user_id), Page::new(Some(first[1].id), Some(2)))
            .await
            .unwrap();
        let ids: Vec<i64> = next.iter().map(|p| p.id.into_inner()).collect();
        assert_eq!(ids, vec![102, 101]);
        assert!(next.iter().all(|p| p.user_vote.is_none()));
    }

    #[tokio::test]
    async fn test_only_author_can_modify() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        let other = store.seed_user(2, "other");
        let community = store.seed_community(10, "rust", &author);
        let post = store.seed_post(100, "Original", &author, &community);

        let service = PostService::new(&ctx);
        let edit = || UpdatePostRequest {
            title: Some("Edited".to_string()),
            content: None,
        };

        assert_eq!(service.update(other.user_id, post.id, edit()).await.unwrap_err().status_code(), 403);
        assert_eq!(service.delete(other.user_id, post.id).await.unwrap_err().status_code(), 403);

        let edited = service.update(author.user_id, post.id, edit()).await.unwrap();
        assert_eq!(edited.title, "Edited");
        assert!(edited.is_edited);
        assert!(edited.edited_at.is_some());

        service.delete(author.user_id, post.id).await.unwrap();
        assert_eq!(service.get(post.id, None).await.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_toggle_save() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        let community = store.seed_community(10, "rust", &author);
        let post = store.seed_post(100, "Keep", &author, &community);

        let service = PostService::new(&ctx);
        assert!(service.toggle_save(author.user_id, post.id).await.unwrap().saved);
        assert!(service.get(post.id, Some(author.user_id)).await.unwrap().saved);
        assert_eq!(service.list_saved(author.user_id, 25).await.unwrap().len(), 1);

        assert!(!service.toggle_save(author.user_id, post.id).await.unwrap().saved);
        assert!(service.list_saved(author.user_id, 25).await.unwrap().is_empty());
        assert_eq!(
            service.toggle_save(author.user_id, Snowflake::new(9)).await.unwrap_err().status_code(),
            404
        );
    }
}
