//! Chat entities - one-to-one conversations and their messages

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{truncate_with_ellipsis, Snowflake};

pub const MESSAGE_MAX_LEN: usize = 5000;
const REPLY_PREVIEW_LEN: usize = 100;
pub const DELETED_MESSAGE_TEXT: &str = "This message was deleted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatParticipant {
    pub user_id: Snowflake,
    pub username: String,
}

/// Denormalized preview of the newest message, kept on the chat row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMessage {
    pub content: String,
    pub sender_id: Snowflake,
    pub sender_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: Snowflake,
    /// Always two, ordered by user id
    pub participants: Vec<ChatParticipant>,
    pub last_message: Option<LastMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(
        id: Snowflake,
        first: ChatParticipant,
        second: ChatParticipant,
    ) -> Result<Self, DomainError> {
        if first.user_id == second.user_id {
            return Err(DomainError::CannotChatWithSelf);
        }
        let mut participants = vec![first, second];
        participants.sort_by_key(|p| p.user_id);

        let now = Utc::now();
        Ok(Self {
            id,
            participants,
            last_message: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// The pair key a chat is unique on
    pub fn pair(a: Snowflake, b: Snowflake) -> (Snowflake, Snowflake) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn has_participant(&self, user_id: Snowflake) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    pub fn ensure_participant(&self, user_id: Snowflake) -> Result<(), DomainError> {
        if self.has_participant(user_id) {
            Ok(())
        } else {
            Err(DomainError::NotChatParticipant)
        }
    }

    /// The participant that isn't `user_id`
    pub fn other_participant(&self, user_id: Snowflake) -> Option<&ChatParticipant> {
        self.participants.iter().find(|p| p.user_id != user_id)
    }
}

/// A chat as listed for one of its participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub chat: Chat,
    /// Messages from the other participant not yet read
    pub unread: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPreview {
    pub message_id: Snowflake,
    pub content: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub sender_id: Snowflake,
    pub sender_username: String,
    pub content: String,
    pub read: bool,
    pub reply_to: Option<ReplyPreview>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Content is trimmed and must be 1..=5000 characters.
    ///
    /// `reply_to` must be a message of the same chat.
    pub fn new(
        id: Snowflake,
        chat_id: Snowflake,
        sender: &ChatParticipant,
        content: &str,
        reply_to: Option<&ChatMessage>,
    ) -> Result<Self, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::ValidationError("Message cannot be empty".into()));
        }
        if content.chars().count() > MESSAGE_MAX_LEN {
            return Err(DomainError::ContentTooLong { max: MESSAGE_MAX_LEN });
        }
        let reply_to = match reply_to {
            Some(m) if m.chat_id != chat_id => return Err(DomainError::MessageNotFound(m.id)),
            Some(m) => Some(m.preview()),
            None => None,
        };

        let now = Utc::now();
        Ok(Self {
            id,
            chat_id,
            sender_id: sender.user_id,
            sender_username: sender.username.clone(),
            content: content.to_string(),
            read: false,
            reply_to,
            deleted: false,
            created_at: now,
            updated_at: now,
        })
    }

    fn preview(&self) -> ReplyPreview {
        let content = if self.deleted {
            DELETED_MESSAGE_TEXT.to_string()
        } else {
            truncate_with_ellipsis(&self.content, REPLY_PREVIEW_LEN)
        };
        ReplyPreview {
            message_id: self.id,
            content,
            username: self.sender_username.clone(),
        }
    }

    pub fn ensure_sender(&self, user_id: Snowflake) -> Result<(), DomainError> {
        if self.sender_id == user_id {
            Ok(())
        } else {
            Err(DomainError::NotMessageSender)
        }
    }

    /// Text shown to readers; deleted messages hide their content
    pub fn display_content(&self) -> &str {
        if self.deleted {
            DELETED_MESSAGE_TEXT
        } else {
            &self.content
        }
    }

    pub fn last_message(&self) -> LastMessage {
        LastMessage {
            content: self.content.clone(),
            sender_id: self.sender_id,
            sender_username: self.sender_username.clone(),
            created_at: self.created_at,
        }
    }
}
