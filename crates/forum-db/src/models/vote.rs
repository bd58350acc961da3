//! Vote database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for votes table
#[derive(Debug, Clone, FromRow)]
pub struct VoteModel {
    pub user_id: i64,
    pub target_id: i64,
    pub target_type: String,
    /// +1 or -1
    pub vote_type: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counter pair returned by the increment statement
#[derive(Debug, Clone, Copy, FromRow)]
pub struct VoteCounterModel {
    pub upvotes: i32,
    pub downvotes: i32,
}
