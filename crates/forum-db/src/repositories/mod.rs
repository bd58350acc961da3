//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in forum-core.
//! Each repository handles database operations for a specific domain entity.

mod chat;
mod comment;
mod community;
mod custom_feed;
mod error;
mod follow;
mod notification;
mod pattern;
mod post;
mod user;
mod vote;

pub use chat::PgChatRepository;
pub use comment::PgCommentRepository;
pub use community::PgCommunityRepository;
pub use custom_feed::PgCustomFeedRepository;
pub use follow::PgFollowRepository;
pub use notification::PgNotificationRepository;
pub use post::PgPostRepository;
pub use user::PgUserRepository;
pub use vote::PgVoteRepository;
