//! Chat service
//!
//! One-to-one chats between users: opening a chat, sending and soft
//! deleting messages, and the unread counters shown in the header.

use forum_cache::{CachedIdentity, PubSubChannel};
use forum_core::entities::ChatParticipant;
use forum_core::events::ChatMessageSentEvent;
use forum_core::{Chat, ChatMessage, DomainError, DomainEvent, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::{
    ChatMessageResponse, ChatMessagesResponse, ChatResponse, MessageResponse, Page,
    SendMessageRequest, StartChatRequest, UnreadCountResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::events;

pub const CHAT_LIST_LIMIT: i64 = 50;

fn participant(identity: &CachedIdentity) -> ChatParticipant {
    ChatParticipant {
        user_id: identity.user_id,
        username: identity.username.clone(),
    }
}

pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A chat the user takes part in
    async fn find_for(&self, user_id: Snowflake, chat_id: Snowflake) -> ServiceResult<Chat> {
        let chat = self
            .ctx
            .chat_repo()
            .find_by_id(chat_id)
            .await?
            .ok_or(DomainError::ChatNotFound(chat_id))?;
        chat.ensure_participant(user_id)?;
        Ok(chat)
    }

    /// Most recently active first
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Snowflake) -> ServiceResult<Vec<ChatResponse>> {
        let chats = self
            .ctx
            .chat_repo()
            .list_for_user(user_id, CHAT_LIST_LIMIT)
            .await?;

        Ok(chats
            .iter()
            .map(|s| ChatResponse::for_viewer(&s.chat, user_id, s.unread))
            .collect())
    }

    /// Open the chat with `username`, creating it on first contact
    #[instrument(skip(self, user, request), fields(user_id = %user.user_id))]
    pub async fn start(
        &self,
        user: &CachedIdentity,
        request: StartChatRequest,
    ) -> ServiceResult<ChatResponse> {
        let username = request.username.trim().to_lowercase();
        let recipient = self
            .ctx
            .user_repo()
            .find_by_username(&username)
            .await?
            .ok_or(DomainError::UsernameNotFound(username))?;

        if recipient.id == user.user_id {
            return Err(DomainError::CannotChatWithSelf.into());
        }

        let repo = self.ctx.chat_repo();
        if let Some(existing) = repo.find_between(user.user_id, recipient.id).await? {
            return Ok(ChatResponse::for_viewer(&existing, user.user_id, 0));
        }

        let chat = Chat::new(
            self.ctx.generate_id(),
            participant(user),
            ChatParticipant {
                user_id: recipient.id,
                username: recipient.username.clone(),
            },
        )?;
        let chat = repo.create(&chat).await?;

        info!(chat_id = %chat.id, recipient_id = %recipient.id, "Chat opened");

        Ok(ChatResponse::for_viewer(&chat, user.user_id, 0))
    }

    /// A page of messages, oldest first
    #[instrument(skip(self))]
    pub async fn messages(
        &self,
        user_id: Snowflake,
        chat_id: Snowflake,
        page: Page,
    ) -> ServiceResult<ChatMessagesResponse> {
        let chat = self.find_for(user_id, chat_id).await?;
        let repo = self.ctx.chat_repo();
        let messages = repo.list_messages(chat.id, page.before, page.limit).await?;
        let unread = messages
            .iter()
            .filter(|m| m.sender_id != user_id && !m.read && !m.deleted)
            .count() as i64;

        Ok(ChatMessagesResponse {
            chat: ChatResponse::for_viewer(&chat, user_id, unread),
            messages: messages.iter().map(ChatMessageResponse::from).collect(),
        })
    }

    #[instrument(skip(self, sender, request), fields(sender_id = %sender.user_id))]
    pub async fn send(
        &self,
        sender: &CachedIdentity,
        chat_id: Snowflake,
        request: SendMessageRequest,
    ) -> ServiceResult<ChatMessageResponse> {
        let chat = self.find_for(sender.user_id, chat_id).await?;
        let repo = self.ctx.chat_repo();

        let reply_to = match request.reply_to {
            Some(id) => Some(
                repo.find_message(chat.id, id)
                    .await?
                    .ok_or(DomainError::MessageNotFound(id))?,
            ),
            None => None,
        };

        let message = ChatMessage::new(
            self.ctx.generate_id(),
            chat.id,
            &participant(sender),
            &request.content,
            reply_to.as_ref(),
        )?;
        repo.add_message(&message).await?;

        debug!(chat_id = %chat.id, message_id = %message.id, "Chat message sent");

        if let Some(recipient) = chat.other_participant(sender.user_id) {
            events::publish(
                self.ctx,
                PubSubChannel::user(recipient.user_id),
                DomainEvent::ChatMessageSent(ChatMessageSentEvent::new(
                    chat.id,
                    message.id,
                    sender.user_id,
                )),
            );
        }

        Ok(ChatMessageResponse::from(&message))
    }

    /// Mark everything the caller received in the chat as read
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: Snowflake, chat_id: Snowflake) -> ServiceResult<MessageResponse> {
        let chat = self.find_for(user_id, chat_id).await?;
        let marked = self.ctx.chat_repo().mark_read(chat.id, user_id).await?;
        debug!(chat_id = %chat.id, marked, "Chat marked read");
        Ok(MessageResponse::new("Messages marked as read"))
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: Snowflake) -> ServiceResult<UnreadCountResponse> {
        let unread_count = self.ctx.chat_repo().unread_count(user_id).await?;
        Ok(UnreadCountResponse { unread_count })
    }

    /// Soft delete; only the sender may delete a message
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        user_id: Snowflake,
        chat_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<MessageResponse> {
        let chat = self.find_for(user_id, chat_id).await?;
        let repo = self.ctx.chat_repo();

        let message = repo
            .find_message(chat.id, message_id)
            .await?
            .filter(|m| !m.deleted)
            .ok_or(DomainError::MessageNotFound(message_id))?;
        message.ensure_sender(user_id)?;

        if !repo.delete_message(chat.id, message.id, user_id).await? {
            return Err(DomainError::MessageNotFound(message_id).into());
        }
        Ok(MessageResponse::new("Message deleted"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::testing::{context, MemoryStore};

    fn start(username: &str) -> StartChatRequest {
        StartChatRequest {
            username: username.to_string(),
        }
    }

    fn say(content: &str) -> SendMessageRequest {
        SendMessageRequest {
            content: content.to_string(),
            reply_to: None,
        }
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_rejects_self() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let amy = store.seed_user(1, "amy");
        store.seed_user(2, "zed");

        let service = ChatService::new(&ctx);
        let chat = service.start(&amy, start("Zed")).await.unwrap();
        assert_eq!(chat.other_user.as_ref().unwrap().username, "zed");
        let again = service.start(&amy, start("zed")).await.unwrap();
        assert_eq!(again.id, chat.id);

        let own = service.start(&amy, start("amy")).await.unwrap_err();
        assert_eq!(own.status_code(), 400);
        let missing = service.start(&amy, start("nobody")).await.unwrap_err();
        assert_eq!(missing.status_code(), 404);
    }

    #[tokio::test]
    async fn test_send_read_and_unread_counts() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let amy = store.seed_user(1, "amy");
        let zed = store.seed_user(2, "zed");

        let service = ChatService::new(&ctx);
        let chat = service.start(&amy, start("zed")).await.unwrap();
        let first = service.send(&amy, chat.id, say("hello")).await.unwrap();
        let reply = service
            .send(
                &zed,
                chat.id,
                SendMessageRequest {
                    content: "hey".into(),
                    reply_to: Some(first.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(reply.reply_to.unwrap().username, "amy");
        service.send(&amy, chat.id, say("how are you")).await.unwrap();

        assert_eq!(service.unread_count(zed.user_id).await.unwrap().unread_count, 2);
        assert_eq!(service.unread_count(amy.user_id).await.unwrap().unread_count, 1);

        let listed = service.list(zed.user_id).await.unwrap();
        assert_eq!(listed[0].unread_count, 2);
        assert_eq!(listed[0].last_message.as_ref().unwrap().content, "how are you");

        let page = service
            .messages(zed.user_id, chat.id, Page::default())
            .await
            .unwrap();
        assert_eq!(page.messages.len(), 3);
        assert_eq!(page.messages[0].content, "hello");

        service.mark_read(zed.user_id, chat.id).await.unwrap();
        assert_eq!(service.unread_count(zed.user_id).await.unwrap().unread_count, 0);
        assert_eq!(service.unread_count(amy.user_id).await.unwrap().unread_count, 1);
    }

    #[tokio::test]
    async fn test_outsiders_and_bad_replies_rejected() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let amy = store.seed_user(1, "amy");
        store.seed_user(2, "zed");
        let eve = store.seed_user(3, "eve");

        let service = ChatService::new(&ctx);
        let chat = service.start(&amy, start("zed")).await.unwrap();

        let err = service.send(&eve, chat.id, say("let me in")).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        let err = service
            .messages(eve.user_id, chat.id, Page::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = service
            .send(
                &amy,
                chat.id,
                SendMessageRequest {
                    content: "re".into(),
                    reply_to: Some(Snowflake::new(999)),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = service.send(&amy, chat.id, say("   ")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_only_sender_deletes() {
        let store = Arc::new(MemoryStore::default());
        let ctx = context(&store);
        let amy = store.seed_user(1, "amy");
        let zed = store.seed_user(2, "zed");

        let service = ChatService::new(&ctx);
        let chat = service.start(&amy, start("zed")).await.unwrap();
        let sent = service.send(&amy, chat.id, say("oops")).await.unwrap();

        let err = service
            .delete_message(zed.user_id, chat.id, sent.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        service.delete_message(amy.user_id, chat.id, sent.id).await.unwrap();
        let page = service
            .messages(zed.user_id, chat.id, Page::default())
            .await
            .unwrap();
        assert!(page.messages[0].deleted);
        assert_eq!(page.messages[0].content, "This message was deleted");

        let twice = service
            .delete_message(amy.user_id, chat.id, sent.id)
            .await
            .unwrap_err();
        assert_eq!(twice.status_code(), 404);
    }
}
