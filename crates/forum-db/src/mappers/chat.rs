//! Chat entity <-> model mapper

use forum_core::entities::{
    Chat, ChatMessage, ChatParticipant, ChatSummary, LastMessage, ReplyPreview,
};
use forum_core::value_objects::Snowflake;

use crate::models::{ChatMessageModel, ChatModel, ChatSummaryModel};

impl From<ChatModel> for Chat {
    fn from(model: ChatModel) -> Self {
        let participants = model
            .participant_ids
            .into_iter()
            .zip(model.participant_usernames)
            .map(|(id, username)| ChatParticipant {
                user_id: Snowflake::new(id),
                username,
            })
            .collect();

        // A preview needs all four columns; they are written together
        let last_message = match (
            model.last_message_content,
            model.last_sender_id,
            model.last_sender_username,
            model.last_message_at,
        ) {
            (Some(content), Some(sender_id), Some(sender_username), Some(created_at)) => {
                Some(LastMessage {
                    content,
                    sender_id: Snowflake::new(sender_id),
                    sender_username,
                    created_at,
                })
            }
            _ => None,
        };

        Chat {
            id: Snowflake::new(model.id),
            participants,
            last_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ChatSummaryModel> for ChatSummary {
    fn from(model: ChatSummaryModel) -> Self {
        ChatSummary {
            chat: Chat::from(model.chat),
            unread: model.unread,
        }
    }
}

impl From<ChatMessageModel> for ChatMessage {
    fn from(model: ChatMessageModel) -> Self {
        let reply_to = model.reply_to_id.map(|id| ReplyPreview {
            message_id: Snowflake::new(id),
            content: model.reply_to_content.unwrap_or_default(),
            username: model.reply_to_username.unwrap_or_default(),
        });

        ChatMessage {
            id: Snowflake::new(model.id),
            chat_id: Snowflake::new(model.chat_id),
            sender_id: Snowflake::new(model.sender_id),
            sender_username: model.sender_username,
            content: model.content,
            read: model.read,
            reply_to,
            deleted: model.deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
