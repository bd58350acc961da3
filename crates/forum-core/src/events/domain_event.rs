//! Domain events - emitted after state changes commit
//!
//! Published over Redis pub/sub so other instances and live clients can
//! refresh counters without polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, TargetType, VoteDirection, VoteOutcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    UserUpdated(UserUpdatedEvent),
    PostCreated(PostCreatedEvent),
    PostDeleted(PostDeletedEvent),
    CommentCreated(CommentCreatedEvent),
    VoteUpdated(VoteUpdatedEvent),
    ChatMessageSent(ChatMessageSentEvent),
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserUpdated(_) => "USER_UPDATED",
            Self::PostCreated(_) => "POST_CREATED",
            Self::PostDeleted(_) => "POST_DELETED",
            Self::CommentCreated(_) => "COMMENT_CREATED",
            Self::VoteUpdated(_) => "VOTE_UPDATED",
            Self::ChatMessageSent(_) => "CHAT_MESSAGE_SENT",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UserUpdated(e) => e.timestamp,
            Self::PostCreated(e) => e.timestamp,
            Self::PostDeleted(e) => e.timestamp,
            Self::CommentCreated(e) => e.timestamp,
            Self::VoteUpdated(e) => e.timestamp,
            Self::ChatMessageSent(e) => e.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdatedEvent {
    pub user_id: Snowflake,
    pub username: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreatedEvent {
    pub post_id: Snowflake,
    pub community_id: Snowflake,
    pub author_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDeletedEvent {
    pub post_id: Snowflake,
    pub community_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedEvent {
    pub comment_id: Snowflake,
    pub post_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub timestamp: DateTime<Utc>,
}

/// Fresh counters of a target after a vote commits.
///
/// Carries no voter identity; `user_vote` is only meaningful to the voter's
/// own sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteUpdatedEvent {
    pub target_id: Snowflake,
    pub target_type: TargetType,
    pub upvotes: i32,
    pub downvotes: i32,
    pub vote_count: i32,
    pub voter_id: Snowflake,
    pub user_vote: Option<VoteDirection>,
    pub timestamp: DateTime<Utc>,
}

/// Sent to the recipient so an open chat list can refresh its unread badge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageSentEvent {
    pub chat_id: Snowflake,
    pub message_id: Snowflake,
    pub sender_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessageSentEvent {
    pub fn new(chat_id: Snowflake, message_id: Snowflake, sender_id: Snowflake) -> Self {
        Self {
            chat_id,
            message_id,
            sender_id,
            timestamp: Utc::now(),
        }
    }
}

impl UserUpdatedEvent {
    pub fn new(user_id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            timestamp: Utc::now(),
        }
    }
}

impl PostCreatedEvent {
    pub fn new(post_id: Snowflake, community_id: Snowflake, author_id: Snowflake) -> Self {
        Self {
            post_id,
            community_id,
            author_id,
            timestamp: Utc::now(),
        }
    }
}

impl PostDeletedEvent {
    pub fn new(post_id: Snowflake, community_id: Snowflake) -> Self {
        Self {
            post_id,
            community_id,
            timestamp: Utc::now(),
        }
    }
}

impl CommentCreatedEvent {
    pub fn new(comment_id: Snowflake, post_id: Snowflake, parent_id: Option<Snowflake>) -> Self {
        Self {
            comment_id,
            post_id,
            parent_id,
            timestamp: Utc::now(),
        }
    }
}

impl VoteUpdatedEvent {
    pub fn from_outcome(outcome: &VoteOutcome, voter_id: Snowflake) -> Self {
        Self {
            target_id: outcome.target_id,
            target_type: outcome.target_type,
            upvotes: outcome.tally.upvotes,
            downvotes: outcome.tally.downvotes,
            vote_count: outcome.vote_count(),
            voter_id,
            user_vote: outcome.user_vote(),
            timestamp: Utc::now(),
        }
    }
}
