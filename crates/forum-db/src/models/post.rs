//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub title: String,
    pub post_type: String,
    pub content: String,
    pub author_id: i64,
    pub author_username: String,
    pub community_id: i64,
    pub community_name: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub comment_count: i32,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
