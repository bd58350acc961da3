//! Vote entity <-> model mapper

use forum_core::entities::Vote;
use forum_core::value_objects::{Snowflake, TargetType, VoteDirection};

use crate::models::VoteModel;

/// The column is constrained to +1/-1
pub fn parse_vote_type(raw: i16) -> VoteDirection {
    if raw < 0 {
        VoteDirection::Down
    } else {
        VoteDirection::Up
    }
}

/// The column is constrained to 'post'/'comment'
pub fn parse_target_type(raw: &str) -> TargetType {
    raw.parse().unwrap_or(TargetType::Post)
}

impl From<VoteModel> for Vote {
    fn from(model: VoteModel) -> Self {
        Vote {
            user_id: Snowflake::new(model.user_id),
            target_id: Snowflake::new(model.target_id),
            target_type: parse_target_type(&model.target_type),
            direction: parse_vote_type(model.vote_type),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
