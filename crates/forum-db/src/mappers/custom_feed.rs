//! Custom feed entity <-> model mapper

use forum_core::entities::CustomFeed;
use forum_core::value_objects::Snowflake;

use crate::models::CustomFeedModel;

impl From<CustomFeedModel> for CustomFeed {
    fn from(model: CustomFeedModel) -> Self {
        CustomFeed {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            creator_id: Snowflake::new(model.creator_id),
            creator_username: model.creator_username,
            community_ids: model.community_ids.into_iter().map(Snowflake::new).collect(),
            is_private: model.is_private,
            show_on_profile: model.show_on_profile,
            is_favorite: model.is_favorite,
            icon_color: model.icon_color,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
