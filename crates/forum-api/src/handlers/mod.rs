//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod chats;
pub mod comments;
pub mod communities;
pub mod custom_feeds;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod users;
pub mod votes;
