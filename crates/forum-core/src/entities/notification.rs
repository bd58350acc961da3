//! Notification entity and the messages generated for each trigger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{truncate_with_ellipsis, Snowflake};

const TITLE_PREVIEW_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Upvote,
    Comment,
    Reply,
    Follow,
    Mention,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Comment => "comment",
            Self::Reply => "reply",
            Self::Follow => "follow",
            Self::Mention => "mention",
        }
    }
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(Self::Upvote),
            "comment" => Ok(Self::Comment),
            "reply" => Ok(Self::Reply),
            "follow" => Ok(Self::Follow),
            "mention" => Ok(Self::Mention),
            other => Err(DomainError::ValidationError(format!(
                "Unknown notification type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    /// Recipient
    pub user_id: Snowflake,
    pub kind: NotificationType,
    pub message: String,
    pub link: String,
    pub from_user_id: Option<Snowflake>,
    pub from_username: Option<String>,
    pub related_post_id: Option<Snowflake>,
    pub related_comment_id: Option<Snowflake>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Who triggered a notification
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub id: Snowflake,
    pub username: &'a str,
}

impl Notification {
    /// Returns `None` when the actor would be notifying themselves.
    fn build(
        id: Snowflake,
        recipient: Snowflake,
        kind: NotificationType,
        message: String,
        link: String,
        actor: Actor<'_>,
    ) -> Option<Self> {
        if recipient == actor.id {
            return None;
        }
        Some(Self {
            id,
            user_id: recipient,
            kind,
            message,
            link,
            from_user_id: Some(actor.id),
            from_username: Some(actor.username.to_string()),
            related_post_id: None,
            related_comment_id: None,
            read: false,
            created_at: Utc::now(),
        })
    }

    pub fn post_comment(
        id: Snowflake,
        post_id: Snowflake,
        post_author: Snowflake,
        post_title: &str,
        actor: Actor<'_>,
    ) -> Option<Self> {
        let message = format!(
            "{} commented on your post \"{}\"",
            actor.username,
            truncate_with_ellipsis(post_title, TITLE_PREVIEW_LEN)
        );
        Self::build(id, post_author, NotificationType::Comment, message, post_link(post_id), actor)
            .map(|n| n.with_post(post_id))
    }

    pub fn comment_reply(
        id: Snowflake,
        post_id: Snowflake,
        parent_comment_id: Snowflake,
        parent_author: Snowflake,
        actor: Actor<'_>,
    ) -> Option<Self> {
        let message = format!("{} replied to your comment", actor.username);
        Self::build(id, parent_author, NotificationType::Reply, message, post_link(post_id), actor)
            .map(|n| n.with_post(post_id).with_comment(parent_comment_id))
    }

    pub fn post_upvote(
        id: Snowflake,
        post_id: Snowflake,
        post_author: Snowflake,
        post_title: &str,
        actor: Actor<'_>,
    ) -> Option<Self> {
        let message = format!(
            "{} upvoted your post \"{}\"",
            actor.username,
            truncate_with_ellipsis(post_title, TITLE_PREVIEW_LEN)
        );
        Self::build(id, post_author, NotificationType::Upvote, message, post_link(post_id), actor)
            .map(|n| n.with_post(post_id))
    }

    pub fn follow(id: Snowflake, followed: Snowflake, actor: Actor<'_>) -> Option<Self> {
        let message = format!("{} started following you", actor.username);
        let link = format!("/user/{}", actor.username);
        Self::build(id, followed, NotificationType::Follow, message, link, actor)
    }

    fn with_post(mut self, post_id: Snowflake) -> Self {
        self.related_post_id = Some(post_id);
        self
    }

    fn with_comment(mut self, comment_id: Snowflake) -> Self {
        self.related_comment_id = Some(comment_id);
        self
    }
}

fn post_link(post_id: Snowflake) -> String {
    format!("/post/{post_id}")
}
