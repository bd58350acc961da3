//! Post entity <-> model mapper

use forum_core::entities::{Post, PostType};
use forum_core::value_objects::Snowflake;

use crate::models::PostModel;

/// Convert the stored post type, falling back to text
pub fn parse_post_type(raw: &str) -> PostType {
    raw.parse().unwrap_or_default()
}

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            title: model.title,
            post_type: parse_post_type(&model.post_type),
            content: model.content,
            author_id: Snowflake::new(model.author_id),
            author_username: model.author_username,
            community_id: Snowflake::new(model.community_id),
            community_name: model.community_name,
            upvotes: model.upvotes,
            downvotes: model.downvotes,
            comment_count: model.comment_count,
            is_edited: model.is_edited,
            edited_at: model.edited_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_type() {
        assert_eq!(parse_post_type("image"), PostType::Image);
        assert_eq!(parse_post_type("link"), PostType::Link);
        assert_eq!(parse_post_type("unknown"), PostType::Text);
    }
}
