//! Comment entity <-> model mapper

use forum_core::entities::Comment;
use forum_core::value_objects::Snowflake;

use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            author_id: Snowflake::new(model.author_id),
            author_username: model.author_username,
            parent_id: model.parent_id.map(Snowflake::new),
            depth: model.depth,
            content: model.content,
            upvotes: model.upvotes,
            downvotes: model.downvotes,
            is_edited: model.is_edited,
            edited_at: model.edited_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
