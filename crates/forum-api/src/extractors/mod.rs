//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, paging, and path ids.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use pagination::{LimitParams, Pagination, PaginationParams};
pub use path::{
    ChatIdPath, ChatMessagePath, CommentIdPath, CommunityNamePath, FeedCommunityPath, FeedIdPath,
    NotificationIdPath, PostIdPath, UsernamePath,
};
pub use validated::{JsonBody, ValidatedJson};
