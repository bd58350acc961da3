//! # forum-core
//!
//! Domain layer: entities, the vote transition rules, value objects,
//! repository traits, and domain events.
//! Nothing in here touches the database, Redis, or HTTP.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

pub use entities::{
    Actor, Chat, ChatMessage, Comment, Community, CustomFeed, Notification, NotificationType,
    Post, PostType, User, Vote,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    ChatRepository, CommentRepository, CommunityRepository, CustomFeedRepository,
    FollowRepository, NotificationRepository, PostQuery, PostRepository, RepoResult,
    UserRepository, VoteRepository,
};
pub use value_objects::{
    format_count, time_ago, CounterDelta, Snowflake, SnowflakeGenerator, SnowflakeParseError,
    TargetType, VoteDirection, VoteOutcome, VoteTally, VoteTransition,
};
