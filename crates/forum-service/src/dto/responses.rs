//! Response DTOs for API endpoints
//!
//! All response DTOs serialize camelCase. Snowflake ids serialize as
//! strings. `userVote` is always present on posts and comments (`null` when
//! the caller has no vote or is anonymous).

use chrono::{DateTime, Utc};
use forum_core::{NotificationType, PostType, Snowflake, VoteDirection};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Snowflake,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    pub bio: String,
    pub banner_color: String,
    pub banner_url: String,
    pub karma: i64,
    pub formatted_karma: String,
    pub cake_day: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated user's own view (adds the email)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub email: String,
}

/// Compact user entry for follower lists
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: Snowflake,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub follower_count: i64,
    pub following_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: ProfileUserResponse,
    pub posts: Vec<PostResponse>,
    pub comments: Vec<CommentResponse>,
    pub followers: Vec<UserSummaryResponse>,
    pub following: Vec<UserSummaryResponse>,
    pub custom_feeds: Vec<CustomFeedResponse>,
    pub is_following: bool,
    /// Only filled on the caller's own profile
    pub saved_posts: Vec<PostResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowResponse {
    pub following: bool,
    pub message: String,
}

// ============================================================================
// Community Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: Snowflake,
    pub name: String,
    pub display_name: String,
    pub title: String,
    pub description: String,
    pub icon_url: String,
    pub banner_url: String,
    pub creator_id: Snowflake,
    pub creator_username: String,
    pub member_count: i32,
    /// Formatted member count, e.g. `1.2k`
    pub members: String,
    pub online: i64,
    pub category: String,
    pub rules: Vec<String>,
    /// Creation date, e.g. `Jan 5, 2025`
    pub created: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_joined: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub joined: bool,
    pub member_count: i32,
}

// ============================================================================
// Post Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Snowflake,
    pub title: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub content: String,
    pub author_id: Snowflake,
    /// Author username
    pub author: String,
    pub community_id: Snowflake,
    pub community_name: String,
    pub subreddit: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub vote_count: i32,
    pub comment_count: i32,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
    pub user_vote: Option<VoteDirection>,
    pub saved: bool,
}

impl PostResponse {
    pub fn with_user_vote(mut self, vote: Option<VoteDirection>) -> Self {
        self.user_vote = vote;
        self
    }

    pub fn with_saved(mut self, saved: bool) -> Self {
        self.saved = saved;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
}

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub depth: i32,
    pub content: String,
    pub author_id: Snowflake,
    /// Author username
    pub author: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub vote_count: i32,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
    pub user_vote: Option<VoteDirection>,
}

impl CommentResponse {
    pub fn with_user_vote(mut self, vote: Option<VoteDirection>) -> Self {
        self.user_vote = vote;
        self
    }
}

// ============================================================================
// Vote Responses
// ============================================================================

/// Authoritative counters after a cast, for client reconciliation
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub vote_count: i32,
    pub user_vote: Option<VoteDirection>,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    pub link: String,
    pub from_user_id: Option<Snowflake>,
    pub from_username: Option<String>,
    pub related_post_id: Option<Snowflake>,
    pub related_comment_id: Option<Snowflake>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    /// Relative age, e.g. `5 minutes ago`
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: i64,
}

// ============================================================================
// Custom Feed Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedCommunityResponse {
    pub id: Snowflake,
    pub name: String,
    pub display_name: String,
    pub icon_url: String,
    pub member_count: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFeedResponse {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    pub creator_id: Snowflake,
    pub creator_username: String,
    pub communities: Vec<FeedCommunityResponse>,
    pub community_count: usize,
    pub is_private: bool,
    pub show_on_profile: bool,
    pub is_favorite: bool,
    pub icon_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub is_favorite: bool,
}

// ============================================================================
// Chat Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParticipantResponse {
    pub id: Snowflake,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageResponse {
    pub content: String,
    pub sender_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub id: Snowflake,
    /// The participant other than the caller
    pub other_user: Option<ChatParticipantResponse>,
    pub participants: Vec<ChatParticipantResponse>,
    pub last_message: Option<LastMessageResponse>,
    pub unread_count: i64,
    pub updated_at: DateTime<Utc>,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyToResponse {
    pub id: Snowflake,
    pub content: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub sender_id: Snowflake,
    pub sender_username: String,
    pub content: String,
    pub read: bool,
    pub reply_to: Option<ReplyToResponse>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagesResponse {
    pub chat: ChatResponse,
    /// Oldest first
    pub messages: Vec<ChatMessageResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let label = |ok: bool| if ok { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if database_healthy && redis_healthy {
                "ready"
            } else {
                "not_ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                redis: label(redis_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
