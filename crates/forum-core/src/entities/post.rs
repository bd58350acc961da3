//! Post entity - a titled submission inside a community

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{Snowflake, VoteTally};

pub const TITLE_MAX_LEN: usize = 300;
pub const CONTENT_MAX_LEN: usize = 40_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Text,
    Image,
    Link,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Link => "link",
        }
    }
}

impl FromStr for PostType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "link" => Ok(Self::Link),
            other => Err(DomainError::ValidationError(format!(
                "Unknown post type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub title: String,
    pub post_type: PostType,
    pub content: String,
    pub author_id: Snowflake,
    pub author_username: String,
    pub community_id: Snowflake,
    pub community_name: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub comment_count: i32,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Snowflake,
        title: String,
        post_type: PostType,
        content: String,
        author_id: Snowflake,
        author_username: String,
        community_id: Snowflake,
        community_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            post_type,
            content,
            author_id,
            author_username,
            community_id,
            community_name,
            upvotes: VoteTally::INITIAL.upvotes,
            downvotes: VoteTally::INITIAL.downvotes,
            comment_count: 0,
            is_edited: false,
            edited_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn tally(&self) -> VoteTally {
        VoteTally::new(self.upvotes, self.downvotes)
    }

    pub fn vote_count(&self) -> i32 {
        self.tally().score()
    }

    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Apply an edit; untouched fields stay as they are
    pub fn edit(&mut self, title: Option<String>, content: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        let now = Utc::now();
        self.is_edited = true;
        self.edited_at = Some(now);
        self.updated_at = now;
    }
}
