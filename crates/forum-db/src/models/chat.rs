//! Chat database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chats joined with its participants
#[derive(Debug, Clone, FromRow)]
pub struct ChatModel {
    pub id: i64,
    /// Aggregated from chat_participants, ordered by user id
    pub participant_ids: Vec<i64>,
    pub participant_usernames: Vec<String>,
    pub last_message_content: Option<String>,
    pub last_sender_id: Option<i64>,
    pub last_sender_username: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A chat row plus the reader's unread count
#[derive(Debug, Clone, FromRow)]
pub struct ChatSummaryModel {
    #[sqlx(flatten)]
    pub chat: ChatModel,
    pub unread: i64,
}

/// Database model for chat_messages table
#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageModel {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_username: String,
    pub content: String,
    pub read: bool,
    pub reply_to_id: Option<i64>,
    pub reply_to_content: Option<String>,
    pub reply_to_username: Option<String>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
