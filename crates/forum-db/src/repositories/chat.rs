//! PostgreSQL implementation of ChatRepository
//!
//! A chat is unique on its ordered `(user_low, user_high)` pair. Sending a
//! message writes the chat's preview columns before inserting the message,
//! so the chat row is locked ahead of `chat_messages` and `users`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use forum_core::entities::{Chat, ChatMessage, ChatSummary};
use forum_core::error::DomainError;
use forum_core::traits::{ChatRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::{ChatMessageModel, ChatModel, ChatSummaryModel};

use super::error::map_db_error;

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// Create a new PgChatRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>> {
        let result = sqlx::query_as::<_, ChatModel>(
            r"
            SELECT c.id,
                   ARRAY(SELECT user_id FROM chat_participants
                         WHERE chat_id = c.id ORDER BY user_id) AS participant_ids,
                   ARRAY(SELECT username::TEXT FROM chat_participants
                         WHERE chat_id = c.id ORDER BY user_id) AS participant_usernames,
                   c.last_message_content, c.last_sender_id, c.last_sender_username,
                   c.last_message_at, c.created_at, c.updated_at
            FROM chats c
            WHERE c.id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chat::from))
    }

    #[instrument(skip(self))]
    async fn find_between(&self, a: Snowflake, b: Snowflake) -> RepoResult<Option<Chat>> {
        let (low, high) = Chat::pair(a, b);
        let result = sqlx::query_as::<_, ChatModel>(
            r"
            SELECT c.id,
                   ARRAY(SELECT user_id FROM chat_participants
                         WHERE chat_id = c.id ORDER BY user_id) AS participant_ids,
                   ARRAY(SELECT username::TEXT FROM chat_participants
                         WHERE chat_id = c.id ORDER BY user_id) AS participant_usernames,
                   c.last_message_content, c.last_sender_id, c.last_sender_username,
                   c.last_message_at, c.created_at, c.updated_at
            FROM chats c
            WHERE c.user_low = $1 AND c.user_high = $2
            ",
        )
        .bind(low.into_inner())
        .bind(high.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chat::from))
    }

    #[instrument(skip(self, chat), fields(chat_id = %chat.id))]
    async fn create(&self, chat: &Chat) -> RepoResult<Chat> {
        let [first, second] = chat.participants.as_slice() else {
            return Err(DomainError::InternalError(
                "A chat needs exactly two participants".into(),
            ));
        };
        let (low, high) = Chat::pair(first.user_id, second.user_id);

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query(
            r"
            INSERT INTO chats (id, user_low, user_high, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_low, user_high) DO NOTHING
            ",
        )
        .bind(chat.id.into_inner())
        .bind(low.into_inner())
        .bind(high.into_inner())
        .bind(chat.created_at)
        .bind(chat.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            debug!("Chat for this pair already exists");
            return self
                .find_between(low, high)
                .await?
                .ok_or(DomainError::ChatNotFound(chat.id));
        }

        for participant in &chat.participants {
            sqlx::query(
                r"
                INSERT INTO chat_participants (chat_id, user_id, username)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(chat.id.into_inner())
            .bind(participant.user_id.into_inner())
            .bind(&participant.username)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(chat.clone())
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<ChatSummary>> {
        let results = sqlx::query_as::<_, ChatSummaryModel>(
            r"
            SELECT c.id,
                   ARRAY(SELECT user_id FROM chat_participants
                         WHERE chat_id = c.id ORDER BY user_id) AS participant_ids,
                   ARRAY(SELECT username::TEXT FROM chat_participants
                         WHERE chat_id = c.id ORDER BY user_id) AS participant_usernames,
                   c.last_message_content, c.last_sender_id, c.last_sender_username,
                   c.last_message_at, c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM chat_messages m
                    WHERE m.chat_id = c.id AND m.sender_id <> $1
                      AND m.read = FALSE AND m.deleted = FALSE) AS unread
            FROM chats c
            INNER JOIN chat_participants p ON p.chat_id = c.id AND p.user_id = $1
            ORDER BY c.updated_at DESC, c.id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ChatSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_messages(
        &self,
        chat_id: Snowflake,
        before: Option<Snowflake>,
        limit: i64,
    ) -> RepoResult<Vec<ChatMessage>> {
        let results = sqlx::query_as::<_, ChatMessageModel>(
            r"
            SELECT * FROM (
                SELECT id, chat_id, sender_id, sender_username, content, read,
                       reply_to_id, reply_to_content, reply_to_username, deleted,
                       created_at, updated_at
                FROM chat_messages
                WHERE chat_id = $1 AND ($2::BIGINT IS NULL OR id < $2)
                ORDER BY id DESC
                LIMIT $3
            ) page
            ORDER BY id
            ",
        )
        .bind(chat_id.into_inner())
        .bind(before.map(Snowflake::into_inner))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ChatMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_message(
        &self,
        chat_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<Option<ChatMessage>> {
        let result = sqlx::query_as::<_, ChatMessageModel>(
            r"
            SELECT id, chat_id, sender_id, sender_username, content, read,
                   reply_to_id, reply_to_content, reply_to_username, deleted,
                   created_at, updated_at
            FROM chat_messages
            WHERE id = $1 AND chat_id = $2
            ",
        )
        .bind(message_id.into_inner())
        .bind(chat_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ChatMessage::from))
    }

    #[instrument(skip(self, message), fields(message_id = %message.id, chat_id = %message.chat_id))]
    async fn add_message(&self, message: &ChatMessage) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let touched = sqlx::query(
            r"
            UPDATE chats
            SET last_message_content = $2, last_sender_id = $3, last_sender_username = $4,
                last_message_at = $5, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(message.chat_id.into_inner())
        .bind(&message.content)
        .bind(message.sender_id.into_inner())
        .bind(&message.sender_username)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if touched.rows_affected() == 0 {
            return Err(DomainError::ChatNotFound(message.chat_id));
        }

        let reply_to = message.reply_to.as_ref();
        sqlx::query(
            r"
            INSERT INTO chat_messages (id, chat_id, sender_id, sender_username, content, read,
                                       reply_to_id, reply_to_content, reply_to_username,
                                       deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.chat_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(&message.sender_username)
        .bind(&message.content)
        .bind(message.read)
        .bind(reply_to.map(|r| r.message_id.into_inner()))
        .bind(reply_to.map(|r| r.content.as_str()))
        .bind(reply_to.map(|r| r.username.as_str()))
        .bind(message.deleted)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, chat_id: Snowflake, reader_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE chat_messages
            SET read = TRUE
            WHERE chat_id = $1 AND sender_id <> $2 AND read = FALSE
            ",
        )
        .bind(chat_id.into_inner())
        .bind(reader_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM chat_messages m
            INNER JOIN chat_participants p ON p.chat_id = m.chat_id AND p.user_id = $1
            WHERE m.sender_id <> $1 AND m.read = FALSE AND m.deleted = FALSE
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn delete_message(
        &self,
        chat_id: Snowflake,
        message_id: Snowflake,
        sender_id: Snowflake,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE chat_messages
            SET deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND chat_id = $2 AND sender_id = $3 AND deleted = FALSE
            ",
        )
        .bind(message_id.into_inner())
        .bind(chat_id.into_inner())
        .bind(sender_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
