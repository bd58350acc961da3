//! Database models - SQLx-compatible structs for PostgreSQL tables

mod chat;
mod comment;
mod community;
mod custom_feed;
mod notification;
mod post;
mod user;
mod vote;

pub use chat::{ChatMessageModel, ChatModel, ChatSummaryModel};
pub use comment::CommentModel;
pub use community::CommunityModel;
pub use custom_feed::CustomFeedModel;
pub use notification::NotificationModel;
pub use post::PostModel;
pub use user::UserModel;
pub use vote::{VoteCounterModel, VoteModel};
