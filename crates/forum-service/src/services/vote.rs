//! Vote service
//!
//! The cast itself is one repository transaction. Broadcasting the new
//! counters and the upvote notification run after commit on a spawned task
//! and never affect the response.

use forum_cache::CachedIdentity;
use forum_core::events::VoteUpdatedEvent;
use forum_core::{Actor, Notification, Snowflake, TargetType, VoteDirection, VoteOutcome};
use tracing::{debug, info, instrument, warn};

use crate::dto::{VoteRequest, VoteResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notification;

pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Cast, switch or withdraw a vote.
    ///
    /// Repeating the standing direction withdraws the vote; the opposite
    /// direction flips it. The response carries the committed counters.
    #[instrument(skip(self, voter, request), fields(voter_id = %voter.user_id))]
    pub async fn cast(
        &self,
        voter: &CachedIdentity,
        target_id: Snowflake,
        target_type: TargetType,
        request: VoteRequest,
    ) -> ServiceResult<VoteResponse> {
        let direction: VoteDirection = request.direction.trim().parse()?;

        let outcome = self
            .ctx
            .vote_repo()
            .cast(voter.user_id, target_id, target_type, direction)
            .await?;

        info!(
            target_id = %target_id,
            target_type = target_type.as_str(),
            transition = ?outcome.transition,
            vote_count = outcome.vote_count(),
            "Vote cast"
        );

        let response = VoteResponse {
            vote_count: outcome.vote_count(),
            user_vote: outcome.user_vote(),
        };

        let ctx = self.ctx.clone();
        let voter = voter.clone();
        tokio::spawn(async move {
            after_cast(&ctx, &voter, &outcome).await;
        });

        Ok(response)
    }
}

async fn after_cast(ctx: &ServiceContext, voter: &CachedIdentity, outcome: &VoteOutcome) {
    let post_id = match outcome.target_type {
        TargetType::Post => outcome.target_id,
        TargetType::Comment => match ctx.comment_repo().find_by_id(outcome.target_id).await {
            Ok(Some(comment)) => comment.post_id,
            Ok(None) => {
                debug!(comment_id = %outcome.target_id, "Voted comment is gone, skipping broadcast");
                return;
            }
            Err(e) => {
                warn!(error = %e, comment_id = %outcome.target_id, "Vote broadcast lookup failed");
                return;
            }
        },
    };

    if outcome.target_type == TargetType::Post
        && outcome.transition.is_fresh_upvote()
        && outcome.author_id != voter.user_id
    {
        notify_upvote(ctx, voter, post_id).await;
    }

    if let Err(e) = ctx
        .publisher()
        .publish_vote_updated(post_id, VoteUpdatedEvent::from_outcome(outcome, voter.user_id))
        .await
    {
        warn!(error = %e, post_id = %post_id, "Vote broadcast failed");
    }
}

async fn notify_upvote(ctx: &ServiceContext, voter: &CachedIdentity, post_id: Snowflake) {
    let post = match ctx.post_repo().find_by_id(post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, post_id = %post_id, "Upvote notification lookup failed");
            return;
        }
    };

    let note = Notification::post_upvote(
        ctx.generate_id(),
        post.id,
        post.author_id,
        &post.title,
        Actor {
            id: voter.user_id,
            username: &voter.username,
        },
    );
    if let Some(note) = note {
        notification::deliver(ctx, &note).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use forum_core::{DomainError, NotificationType};

    use super::*;
    use crate::services::testing::{context, MemoryStore};
    use crate::services::ServiceError;

    fn vote(direction: &str) -> VoteRequest {
        VoteRequest {
            direction: direction.to_string(),
        }
    }

    #[tokio::test]
    async fn test_down_then_up_flips_counters() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        let voter = store.seed_user(2, "voter");
        let community = store.seed_community(10, "rust", &author);
        let post = store.seed_post(100, "Hello", &author, &community);

        let service = VoteService::new(&ctx);

        let down = service.cast(&voter, post.id, TargetType::Post, vote("down")).await.unwrap();
        assert_eq!(down.vote_count, 0);
        assert_eq!(down.user_vote, Some(VoteDirection::Down));
        let stored = store.post(post.id).unwrap();
        assert_eq!((stored.upvotes, stored.downvotes), (1, 1));

        let up = service.cast(&voter, post.id, TargetType::Post, vote("up")).await.unwrap();
        assert_eq!(up.vote_count, 2);
        assert_eq!(up.user_vote, Some(VoteDirection::Up));
        let stored = store.post(post.id).unwrap();
        assert_eq!((stored.upvotes, stored.downvotes), (2, 0));

        // 1 (signup) - 1 (down) + 2 (flip)
        assert_eq!(store.karma(author.user_id), 2);
    }

    #[tokio::test]
    async fn test_repeat_withdraws_vote() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        let voter = store.seed_user(2, "voter");
        let community = store.seed_community(10, "rust", &author);
        let post = store.seed_post(100, "Hello", &author, &community);

        let service = VoteService::new(&ctx);
        service.cast(&voter, post.id, TargetType::Post, vote("up")).await.unwrap();
        let again = service.cast(&voter, post.id, TargetType::Post, vote("up")).await.unwrap();

        assert_eq!(again.vote_count, 1);
        assert_eq!(again.user_vote, None);
        assert_eq!(store.karma(author.user_id), 1);
    }

    #[tokio::test]
    async fn test_invalid_direction_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        let community = store.seed_community(10, "rust", &author);
        let post = store.seed_post(100, "Hello", &author, &community);

        let err = VoteService::new(&ctx)
            .cast(&author, post.id, TargetType::Post, vote("sideways"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(store.post(post.id).unwrap().upvotes, 1);
    }

    #[tokio::test]
    async fn test_missing_target_is_not_found() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let voter = store.seed_user(2, "voter");

        let err = VoteService::new(&ctx)
            .cast(&voter, Snowflake::new(404), TargetType::Comment, vote("up"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::CommentNotFound(_))));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_fresh_upvote_notifies_author_once() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        let voter = store.seed_user(2, "voter");
        let community = store.seed_community(10, "rust", &author);
        let post = store.seed_post(100, "Hello", &author, &community);

        let service = VoteService::new(&ctx);
        service.cast(&voter, post.id, TargetType::Post, vote("up")).await.unwrap();

        let notes = store.wait_for_notifications(author.user_id, 1).await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationType::Upvote);
        assert_eq!(notes[0].message, "voter upvoted your post \"Hello\"");

        // Withdrawing and flipping are not fresh upvotes
        service.cast(&voter, post.id, TargetType::Post, vote("up")).await.unwrap();
        service.cast(&voter, post.id, TargetType::Post, vote("down")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(store.notifications_for(author.user_id).len(), 1);
    }

    #[tokio::test]
    async fn test_self_upvote_does_not_notify() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let author = store.seed_user(1, "author");
        let community = store.seed_community(10, "rust", &author);
        let post = store.seed_post(100, "Hello", &author, &community);

        let response = VoteService::new(&ctx)
            .cast(&author, post.id, TargetType::Post, vote("up"))
            .await
            .unwrap();
        assert_eq!(response.vote_count, 2);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(store.notifications_for(author.user_id).is_empty());
    }
}
