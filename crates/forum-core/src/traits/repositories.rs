//! Repository traits (ports) - the data access the domain needs
//!
//! The infrastructure layer provides the implementations.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{
    Chat, ChatMessage, ChatSummary, Comment, Community, CustomFeed, Notification, Post, User, Vote,
};
use crate::error::DomainError;
use crate::value_objects::{Snowflake, TargetType, VoteDirection, VoteOutcome};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Case-insensitive lookup
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Substring match on username or display name
    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<User>>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Persist profile fields. When the username changed from
    /// `previous_username`, every denormalized copy is renamed in the same
    /// transaction.
    async fn update_profile(&self, user: &User, previous_username: &str) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;
}

// ============================================================================
// Community Repository
// ============================================================================

#[async_trait]
pub trait CommunityRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Community>>;

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Community>>;

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Community>>;

    /// Largest communities first
    async fn list_popular(&self, limit: i64) -> RepoResult<Vec<Community>>;

    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<Community>>;

    /// Insert the community and its creator's membership together
    async fn create(&self, community: &Community) -> RepoResult<()>;

    /// Returns `false` if the user was already a member
    async fn join(&self, community_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Returns `false` if the user was not a member
    async fn leave(&self, community_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    async fn is_member(&self, community_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    async fn list_joined(&self, user_id: Snowflake) -> RepoResult<Vec<Community>>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Filter and cursor for post listings, newest first
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub community_ids: Option<Vec<Snowflake>>,
    pub author_id: Option<Snowflake>,
    /// Only posts with an id lower than this
    pub before: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    async fn list(&self, query: PostQuery) -> RepoResult<Vec<Post>>;

    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Persist title, content, and edit markers
    async fn update(&self, post: &Post) -> RepoResult<()>;

    /// Delete the post with its comments and every vote on either
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Flip the saved flag, returning the new state
    async fn toggle_saved(&self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool>;

    /// Which of `post_ids` the user has saved
    async fn saved_among(&self, user_id: Snowflake, post_ids: &[Snowflake])
        -> RepoResult<Vec<Snowflake>>;

    /// Most recently saved first
    async fn list_saved(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Post>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// All comments of a post, oldest first
    async fn list_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<Comment>>;

    /// Newest first
    async fn list_by_author(&self, author_id: Snowflake, limit: i64) -> RepoResult<Vec<Comment>>;

    /// Insert and bump the post's comment count atomically
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    async fn update(&self, comment: &Comment) -> RepoResult<()>;

    /// Delete the comment and its replies, returning how many were removed
    async fn delete(&self, id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Apply a vote as one atomic unit: read the standing vote, resolve the
    /// transition, write the ledger row and the counters, adjust karma.
    ///
    /// Fails with a not-found error when the target does not exist.
    async fn cast(
        &self,
        user_id: Snowflake,
        target_id: Snowflake,
        target_type: TargetType,
        direction: VoteDirection,
    ) -> RepoResult<VoteOutcome>;

    async fn find(
        &self,
        user_id: Snowflake,
        target_id: Snowflake,
        target_type: TargetType,
    ) -> RepoResult<Option<Vote>>;

    /// The user's votes on a batch of targets in one lookup
    async fn find_for_targets(
        &self,
        user_id: Snowflake,
        target_ids: &[Snowflake],
        target_type: TargetType,
    ) -> RepoResult<HashMap<Snowflake, VoteDirection>>;

    /// Ledger totals `(up, down)` for a target
    async fn ledger_totals(&self, target_id: Snowflake, target_type: TargetType)
        -> RepoResult<(i64, i64)>;
}

// ============================================================================
// Follow Repository
// ============================================================================

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Returns `false` if already following
    async fn follow(&self, follower_id: Snowflake, followee_id: Snowflake) -> RepoResult<bool>;

    /// Returns `false` if not following
    async fn unfollow(&self, follower_id: Snowflake, followee_id: Snowflake) -> RepoResult<bool>;

    async fn is_following(&self, follower_id: Snowflake, followee_id: Snowflake)
        -> RepoResult<bool>;

    async fn followers(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<User>>;

    async fn following(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<User>>;

    /// `(followers, following)`
    async fn counts(&self, user_id: Snowflake) -> RepoResult<(i64, i64)>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> RepoResult<()>;

    /// Newest first
    async fn list_for_user(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Notification>>;

    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64>;

    /// Returns `false` if no such notification belongs to the user
    async fn mark_read(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    async fn mark_all_read(&self, user_id: Snowflake) -> RepoResult<u64>;

    async fn delete(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Custom Feed Repository
// ============================================================================

#[async_trait]
pub trait CustomFeedRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CustomFeed>>;

    /// Favorites first, then by name
    async fn list_by_creator(&self, creator_id: Snowflake) -> RepoResult<Vec<CustomFeed>>;

    /// Feeds that are public and shown on the creator's profile, by name
    async fn list_public_by_creator(&self, creator_id: Snowflake, limit: i64)
        -> RepoResult<Vec<CustomFeed>>;

    /// Case-insensitive name check, optionally ignoring one feed
    async fn name_exists(
        &self,
        creator_id: Snowflake,
        name: &str,
        excluding: Option<Snowflake>,
    ) -> RepoResult<bool>;

    async fn create(&self, feed: &CustomFeed) -> RepoResult<()>;

    /// Persist name, description and visibility flags. `is_favorite` only
    /// changes through [`Self::toggle_favorite`].
    async fn update(&self, feed: &CustomFeed) -> RepoResult<()>;

    async fn add_community(&self, feed_id: Snowflake, community_id: Snowflake) -> RepoResult<bool>;

    async fn remove_community(&self, feed_id: Snowflake, community_id: Snowflake)
        -> RepoResult<bool>;

    /// Flip `is_favorite` in one statement and return the new value
    async fn toggle_favorite(&self, id: Snowflake) -> RepoResult<bool>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>>;

    /// The chat between two users, in either order
    async fn find_between(&self, a: Snowflake, b: Snowflake) -> RepoResult<Option<Chat>>;

    /// Insert the chat and its participants. If a chat for the same pair was
    /// created concurrently, that one is returned instead.
    async fn create(&self, chat: &Chat) -> RepoResult<Chat>;

    /// Most recently active first, with the caller's unread count
    async fn list_for_user(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<ChatSummary>>;

    /// Up to `limit` messages older than `before`, returned oldest first
    async fn list_messages(
        &self,
        chat_id: Snowflake,
        before: Option<Snowflake>,
        limit: i64,
    ) -> RepoResult<Vec<ChatMessage>>;

    async fn find_message(&self, chat_id: Snowflake, message_id: Snowflake)
        -> RepoResult<Option<ChatMessage>>;

    /// Store a message and make it the chat's last message
    async fn add_message(&self, message: &ChatMessage) -> RepoResult<()>;

    /// Mark every message `reader_id` received in the chat as read
    async fn mark_read(&self, chat_id: Snowflake, reader_id: Snowflake) -> RepoResult<u64>;

    /// Unread messages across all of the user's chats
    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64>;

    /// Soft delete. Returns `false` if the sender has no such message.
    async fn delete_message(
        &self,
        chat_id: Snowflake,
        message_id: Snowflake,
        sender_id: Snowflake,
    ) -> RepoResult<bool>;
}
