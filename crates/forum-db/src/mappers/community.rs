//! Community entity <-> model mapper

use forum_core::entities::Community;
use forum_core::value_objects::Snowflake;

use crate::models::CommunityModel;

impl From<CommunityModel> for Community {
    fn from(model: CommunityModel) -> Self {
        Community {
            id: Snowflake::new(model.id),
            name: model.name,
            display_name: model.display_name,
            title: model.title,
            description: model.description,
            icon_url: model.icon_url,
            banner_url: model.banner_url,
            creator_id: Snowflake::new(model.creator_id),
            creator_username: model.creator_username,
            member_count: model.member_count,
            category: model.category,
            rules: model.rules,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
