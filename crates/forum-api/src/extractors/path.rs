//! Path parameter extractors
//!
//! Ids arrive as decimal strings and are parsed into [`Snowflake`]s so a
//! malformed id is a 400 with the uniform error body.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use forum_core::Snowflake;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

macro_rules! id_path {
    ($(#[$meta:meta])* $name:ident, $field:ident) => {
        $(#[$meta])*
        #[derive(Debug, Deserialize)]
        pub struct $name {
            $field: String,
        }

        #[async_trait]
        impl<S> FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = ApiError;

            async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
                extract(parts, state).await
            }
        }

        impl $name {
            pub fn $field(&self) -> Result<Snowflake, ApiError> {
                parse_id(&self.$field, stringify!($field))
            }
        }
    };
}

async fn extract<S, T>(parts: &mut Parts, state: &S) -> Result<T, ApiError>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    let Path(inner) = Path::<T>::from_request_parts(parts, state)
        .await
        .map_err(|e| ApiError::invalid_path(e.to_string()))?;
    Ok(inner)
}

id_path!(
    /// `/posts/:post_id`
    PostIdPath,
    post_id
);
id_path!(
    /// `/comments/:comment_id`
    CommentIdPath,
    comment_id
);
id_path!(
    /// `/custom-feeds/:feed_id`
    FeedIdPath,
    feed_id
);
id_path!(NotificationIdPath, notification_id);
id_path!(ChatIdPath, chat_id);

/// `/chats/:chat_id/messages/:message_id`
#[derive(Debug, Deserialize)]
pub struct ChatMessagePath {
    chat_id: String,
    message_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for ChatMessagePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        extract(parts, state).await
    }
}

impl ChatMessagePath {
    pub fn chat_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.chat_id, "chat_id")
    }

    pub fn message_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.message_id, "message_id")
    }
}

/// `/custom-feeds/:feed_id/communities/:community_id`
#[derive(Debug, Deserialize)]
pub struct FeedCommunityPath {
    feed_id: String,
    community_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for FeedCommunityPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        extract(parts, state).await
    }
}

impl FeedCommunityPath {
    pub fn feed_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.feed_id, "feed_id")
    }

    pub fn community_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.community_id, "community_id")
    }
}

/// `/users/:username`
#[derive(Debug, Deserialize)]
pub struct UsernamePath {
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for UsernamePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        extract(parts, state).await
    }
}

/// `/communities/:name`
#[derive(Debug, Deserialize)]
pub struct CommunityNamePath {
    pub name: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CommunityNamePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        extract(parts, state).await
    }
}
