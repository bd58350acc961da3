//! Entity to DTO mappers
//!
//! Relative ages are computed against `Utc::now()` at mapping time.

use chrono::Utc;
use forum_core::entities::{ChatParticipant, ReplyPreview};
use forum_core::value_objects::short_date;
use forum_core::{
    format_count, time_ago, Chat, ChatMessage, Comment, Community, CustomFeed, Notification, Post,
    Snowflake, User,
};

use super::responses::{
    ChatMessageResponse, ChatParticipantResponse, ChatResponse, CommentResponse,
    CommunityResponse, CurrentUserResponse, CustomFeedResponse, FeedCommunityResponse,
    LastMessageResponse, NotificationResponse, PostResponse, ReplyToResponse, UserResponse,
    UserSummaryResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar_url(),
            bio: user.bio.clone(),
            banner_color: user.banner_color.clone(),
            banner_url: user.banner_url.clone(),
            karma: user.karma,
            formatted_karma: user.formatted_karma(),
            cake_day: user.cake_day(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            user: UserResponse::from(user),
            email: user.email.clone(),
        }
    }
}

impl From<&User> for UserSummaryResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar_url(),
        }
    }
}

// ============================================================================
// Community Mappers
// ============================================================================

impl From<&Community> for CommunityResponse {
    fn from(community: &Community) -> Self {
        Self {
            id: community.id,
            name: community.name.clone(),
            display_name: community.display_name.clone(),
            title: community.title.clone(),
            description: community.description.clone(),
            icon_url: community.icon(),
            banner_url: community.banner(),
            creator_id: community.creator_id,
            creator_username: community.creator_username.clone(),
            member_count: community.member_count,
            members: format_count(i64::from(community.member_count)),
            online: community.online_estimate(),
            category: community.category.clone(),
            rules: community.rules.clone(),
            created: short_date(community.created_at),
            created_at: community.created_at,
            is_joined: None,
        }
    }
}

impl From<&Community> for FeedCommunityResponse {
    fn from(community: &Community) -> Self {
        Self {
            id: community.id,
            name: community.name.clone(),
            display_name: community.display_name.clone(),
            icon_url: community.icon(),
            member_count: community.member_count,
        }
    }
}

// ============================================================================
// Post / Comment Mappers
// ============================================================================

/// Vote and saved flags start unset; the service fills them per caller
impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            post_type: post.post_type,
            content: post.content.clone(),
            author_id: post.author_id,
            author: post.author_username.clone(),
            community_id: post.community_id,
            community_name: post.community_name.clone(),
            subreddit: post.community_name.clone(),
            upvotes: post.upvotes,
            downvotes: post.downvotes,
            vote_count: post.vote_count(),
            comment_count: post.comment_count,
            is_edited: post.is_edited,
            edited_at: post.edited_at,
            created_at: post.created_at,
            time_ago: time_ago(post.created_at, Utc::now()),
            user_vote: None,
            saved: false,
        }
    }
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            depth: comment.depth,
            content: comment.content.clone(),
            author_id: comment.author_id,
            author: comment.author_username.clone(),
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
            vote_count: comment.vote_count(),
            is_edited: comment.is_edited,
            edited_at: comment.edited_at,
            created_at: comment.created_at,
            time_ago: time_ago(comment.created_at, Utc::now()),
            user_vote: None,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            message: n.message.clone(),
            link: n.link.clone(),
            from_user_id: n.from_user_id,
            from_username: n.from_username.clone(),
            related_post_id: n.related_post_id,
            related_comment_id: n.related_comment_id,
            read: n.read,
            created_at: n.created_at,
            time: time_ago(n.created_at, Utc::now()),
        }
    }
}

// ============================================================================
// Chat Mappers
// ============================================================================

impl From<&ChatParticipant> for ChatParticipantResponse {
    fn from(p: &ChatParticipant) -> Self {
        Self {
            id: p.user_id,
            username: p.username.clone(),
        }
    }
}

impl From<&ReplyPreview> for ReplyToResponse {
    fn from(r: &ReplyPreview) -> Self {
        Self {
            id: r.message_id,
            content: r.content.clone(),
            username: r.username.clone(),
        }
    }
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(m: &ChatMessage) -> Self {
        Self {
            id: m.id,
            chat_id: m.chat_id,
            sender_id: m.sender_id,
            sender_username: m.sender_username.clone(),
            content: m.display_content().to_string(),
            read: m.read,
            reply_to: m.reply_to.as_ref().map(ReplyToResponse::from),
            deleted: m.deleted,
            created_at: m.created_at,
            time: time_ago(m.created_at, Utc::now()),
        }
    }
}

impl ChatResponse {
    /// The chat as `viewer` sees it
    pub fn for_viewer(chat: &Chat, viewer: Snowflake, unread_count: i64) -> Self {
        Self {
            id: chat.id,
            other_user: chat.other_participant(viewer).map(ChatParticipantResponse::from),
            participants: chat.participants.iter().map(ChatParticipantResponse::from).collect(),
            last_message: chat.last_message.as_ref().map(|m| LastMessageResponse {
                content: m.content.clone(),
                sender_username: m.sender_username.clone(),
                created_at: m.created_at,
            }),
            unread_count,
            updated_at: chat.updated_at,
            time: time_ago(chat.updated_at, Utc::now()),
        }
    }
}

// ============================================================================
// Custom Feed Mappers
// ============================================================================

impl CustomFeedResponse {
    /// `communities` are the resolved members of the feed, in feed order
    pub fn new(feed: &CustomFeed, communities: &[Community]) -> Self {
        let communities: Vec<FeedCommunityResponse> = feed
            .community_ids
            .iter()
            .filter_map(|id| communities.iter().find(|c| c.id == *id))
            .map(FeedCommunityResponse::from)
            .collect();

        Self {
            id: feed.id,
            name: feed.name.clone(),
            description: feed.description.clone(),
            creator_id: feed.creator_id,
            creator_username: feed.creator_username.clone(),
            community_count: communities.len(),
            communities,
            is_private: feed.is_private,
            show_on_profile: feed.show_on_profile,
            is_favorite: feed.is_favorite,
            icon_color: feed.icon_color.clone(),
            created_at: feed.created_at,
            updated_at: feed.updated_at,
        }
    }
}
