//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("User not found: {0}")]
    UsernameNotFound(String),

    #[error("Community not found: {0}")]
    CommunityNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Custom feed not found: {0}")]
    CustomFeedNotFound(Snowflake),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Snowflake),

    #[error("Chat not found: {0}")]
    ChatNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid community name: {0}")]
    InvalidCommunityName(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid vote direction: {0:?} (expected \"up\" or \"down\")")]
    InvalidVoteDirection(String),

    #[error("Invalid vote target: {0:?} (expected \"post\" or \"comment\")")]
    InvalidTargetType(String),

    #[error("Cannot follow yourself")]
    CannotFollowSelf,

    #[error("Parent comment belongs to a different post")]
    ParentCommentMismatch,

    #[error("Community already in feed")]
    CommunityAlreadyInFeed,

    #[error("The creator cannot leave their own community")]
    CreatorCannotLeave,

    #[error("Cannot chat with yourself")]
    CannotChatWithSelf,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the author can modify this {0}")]
    NotAuthor(&'static str),

    #[error("Not authorized")]
    NotFeedOwner,

    #[error("This feed is private")]
    PrivateFeed,

    #[error("You must join this community before adding it to your feed")]
    NotCommunityMember,

    #[error("Not a participant in this chat")]
    NotChatParticipant,

    #[error("You can only delete your own messages")]
    NotMessageSender,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Community name already taken")]
    CommunityNameTaken,

    #[error("You already have a feed with this name")]
    CustomFeedNameTaken,

    #[error("A vote for this target is already being recorded")]
    DuplicateVote,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) | Self::UsernameNotFound(_) => "UNKNOWN_USER",
            Self::CommunityNotFound(_) => "UNKNOWN_COMMUNITY",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::CustomFeedNotFound(_) => "UNKNOWN_CUSTOM_FEED",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",
            Self::ChatNotFound(_) => "UNKNOWN_CHAT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::InvalidCommunityName(_) => "INVALID_COMMUNITY_NAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidVoteDirection(_) => "INVALID_VOTE_DIRECTION",
            Self::InvalidTargetType(_) => "INVALID_TARGET_TYPE",
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::ParentCommentMismatch => "PARENT_COMMENT_MISMATCH",
            Self::CommunityAlreadyInFeed => "COMMUNITY_ALREADY_IN_FEED",
            Self::CreatorCannotLeave => "CREATOR_CANNOT_LEAVE",
            Self::CannotChatWithSelf => "CANNOT_CHAT_WITH_SELF",

            Self::NotAuthor(_) => "NOT_AUTHOR",
            Self::NotFeedOwner => "NOT_FEED_OWNER",
            Self::PrivateFeed => "PRIVATE_FEED",
            Self::NotCommunityMember => "NOT_COMMUNITY_MEMBER",
            Self::NotChatParticipant => "NOT_CHAT_PARTICIPANT",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",

            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::CommunityNameTaken => "COMMUNITY_NAME_TAKEN",
            Self::CustomFeedNameTaken => "CUSTOM_FEED_NAME_TAKEN",
            Self::DuplicateVote => "DUPLICATE_VOTE",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::UsernameNotFound(_)
                | Self::CommunityNotFound(_)
                | Self::PostNotFound(_)
                | Self::CommentNotFound(_)
                | Self::CustomFeedNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::ChatNotFound(_)
                | Self::MessageNotFound(_)
        )
    }

    /// Bad input or a request that breaks a business rule (400)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::InvalidCommunityName(_)
                | Self::WeakPassword(_)
                | Self::ContentTooLong { .. }
                | Self::InvalidVoteDirection(_)
                | Self::InvalidTargetType(_)
                | Self::CannotFollowSelf
                | Self::ParentCommentMismatch
                | Self::CommunityAlreadyInFeed
                | Self::CreatorCannotLeave
                | Self::CannotChatWithSelf
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAuthor(_)
                | Self::NotFeedOwner
                | Self::PrivateFeed
                | Self::NotCommunityMember
                | Self::NotChatParticipant
                | Self::NotMessageSender
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::UsernameTaken
                | Self::CommunityNameTaken
                | Self::CustomFeedNameTaken
                | Self::DuplicateVote
        )
    }
}
