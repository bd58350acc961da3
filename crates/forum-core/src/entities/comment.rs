//! Comment entity - a reply to a post or to another comment

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{Snowflake, VoteTally};

pub const CONTENT_MAX_LEN: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub author_username: String,
    pub parent_id: Option<Snowflake>,
    /// 0 for top-level comments
    pub depth: i32,
    pub content: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a comment, threading it under `parent` when given.
    ///
    /// The parent must belong to the same post.
    pub fn new(
        id: Snowflake,
        post_id: Snowflake,
        author_id: Snowflake,
        author_username: String,
        content: String,
        parent: Option<&Comment>,
    ) -> Result<Self, DomainError> {
        let depth = match parent {
            Some(p) if p.post_id != post_id => return Err(DomainError::ParentCommentMismatch),
            Some(p) => p.depth + 1,
            None => 0,
        };

        let now = Utc::now();
        Ok(Self {
            id,
            post_id,
            author_id,
            author_username,
            parent_id: parent.map(|p| p.id),
            depth,
            content,
            upvotes: VoteTally::INITIAL.upvotes,
            downvotes: VoteTally::INITIAL.downvotes,
            is_edited: false,
            edited_at: None,
            created_at: now,
            updated_at: now,
        })
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

    pub fn edit(&mut self, content: String) {
        let now = Utc::now();
        self.content = content;
        self.is_edited = true;
        self.edited_at = Some(now);
        self.updated_at = now;
    }
}
