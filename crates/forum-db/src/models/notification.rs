//! Notification database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notifications table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub message: String,
    pub link: String,
    pub from_user_id: Option<i64>,
    pub from_username: Option<String>,
    pub related_post_id: Option<i64>,
    pub related_comment_id: Option<i64>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
