//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! request and orchestrates repositories, cache stores, and side effects.

pub mod auth;
pub mod chat;
pub mod comment;
pub mod community;
pub mod context;
pub mod custom_feed;
pub mod error;
mod events;
pub mod notification;
pub mod post;
pub mod user;
pub mod vote;

#[cfg(test)]
mod testing;

pub use auth::AuthService;
pub use chat::ChatService;
pub use comment::CommentService;
pub use community::CommunityService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use custom_feed::CustomFeedService;
pub use error::{ServiceError, ServiceResult};
pub use notification::NotificationService;
pub use post::PostService;
pub use user::UserService;
pub use vote::VoteService;
