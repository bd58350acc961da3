//! Domain entities - core business objects

pub mod chat;
pub mod comment;
pub mod community;
pub mod custom_feed;
pub mod notification;
pub mod post;
pub mod user;
mod vote;

pub use chat::{Chat, ChatMessage, ChatParticipant, ChatSummary, LastMessage, ReplyPreview};
pub use comment::Comment;
pub use community::Community;
pub use custom_feed::CustomFeed;
pub use notification::{Actor, Notification, NotificationType};
pub use post::{Post, PostType};
pub use user::User;
pub use vote::Vote;
