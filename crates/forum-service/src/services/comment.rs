//! Comment service

use forum_cache::{CachedIdentity, PubSubChannel};
use forum_core::events::CommentCreatedEvent;
use forum_core::{Actor, Comment, DomainError, DomainEvent, Notification, Snowflake, TargetType};
use tracing::{info, instrument};

use crate::dto::{CommentResponse, CreateCommentRequest, MessageResponse, UpdateCommentRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::{events, notification};

/// Decorate comments with the viewer's votes, one lookup for the batch
pub(crate) async fn comment_views(
    ctx: &ServiceContext,
    viewer: Option<Snowflake>,
    comments: &[Comment],
) -> ServiceResult<Vec<CommentResponse>> {
    let Some(viewer) = viewer.filter(|_| !comments.is_empty()) else {
        return Ok(comments.iter().map(CommentResponse::from).collect());
    };

    let ids: Vec<Snowflake> = comments.iter().map(|c| c.id).collect();
    let votes = ctx
        .vote_repo()
        .find_for_targets(viewer, &ids, TargetType::Comment)
        .await?;

    Ok(comments
        .iter()
        .map(|c| CommentResponse::from(c).with_user_vote(votes.get(&c.id).copied()))
        .collect())
}

pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Top-level comments notify the post author, replies the parent's author
    #[instrument(skip(self, author, request), fields(author_id = %author.user_id))]
    pub async fn create(
        &self,
        author: &CachedIdentity,
        post_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(ServiceError::validation("Comment content is required"));
        }

        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        let parent = match request.parent_id {
            Some(parent_id) => Some(
                self.ctx
                    .comment_repo()
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(DomainError::CommentNotFound(parent_id))?,
            ),
            None => None,
        };

        let comment = Comment::new(
            self.ctx.generate_id(),
            post.id,
            author.user_id,
            author.username.clone(),
            content,
            parent.as_ref(),
        )?;
        self.ctx.comment_repo().create(&comment).await?;

        info!(
            comment_id = %comment.id,
            post_id = %post.id,
            depth = comment.depth,
            "Comment created"
        );

        let actor = Actor {
            id: author.user_id,
            username: &author.username,
        };
        let note = match &parent {
            Some(parent) => Notification::comment_reply(
                self.ctx.generate_id(),
                post.id,
                parent.id,
                parent.author_id,
                actor,
            ),
            None => Notification::post_comment(
                self.ctx.generate_id(),
                post.id,
                post.author_id,
                &post.title,
                actor,
            ),
        };
        notification::dispatch(self.ctx, note);

        events::publish(
            self.ctx,
            PubSubChannel::post(post.id),
            DomainEvent::CommentCreated(CommentCreatedEvent::new(
                comment.id,
                post.id,
                comment.parent_id,
            )),
        );

        Ok(CommentResponse::from(&comment))
    }

    /// Every comment of a post, oldest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        post_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<Vec<CommentResponse>> {
        if self.ctx.post_repo().find_by_id(post_id).await?.is_none() {
            return Err(DomainError::PostNotFound(post_id).into());
        }

        let comments = self.ctx.comment_repo().list_by_post(post_id).await?;
        comment_views(self.ctx, viewer, &comments).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        user_id: Snowflake,
        comment_id: Snowflake,
        request: UpdateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let mut comment = self.find(comment_id).await?;
        if !comment.is_author(user_id) {
            return Err(DomainError::NotAuthor("comment").into());
        }

        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(ServiceError::validation("Comment content is required"));
        }

        comment.edit(content);
        self.ctx.comment_repo().update(&comment).await?;

        info!(comment_id = %comment.id, "Comment updated");

        let mut views = comment_views(self.ctx, Some(user_id), std::slice::from_ref(&comment)).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::internal("comment view missing"))
    }

    /// Removes the comment and its replies
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Snowflake, comment_id: Snowflake) -> ServiceResult<MessageResponse> {
        let comment = self.find(comment_id).await?;
        if !comment.is_author(user_id) {
            return Err(DomainError::NotAuthor("comment").into());
        }

        let removed = self.ctx.comment_repo().delete(comment.id).await?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, removed, "Comment deleted");

        Ok(MessageResponse::new("Comment deleted"))
    }

    async fn find(&self, comment_id: Snowflake) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::CommentNotFound(comment_id).into())
    }
}
