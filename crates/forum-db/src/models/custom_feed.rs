//! Custom feed database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for custom_feeds joined with its community ids
#[derive(Debug, Clone, FromRow)]
pub struct CustomFeedModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub creator_id: i64,
    pub creator_username: String,
    /// Aggregated from custom_feed_communities, oldest first
    pub community_ids: Vec<i64>,
    pub is_private: bool,
    pub show_on_profile: bool,
    pub is_favorite: bool,
    pub icon_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
