//! User entity <-> model mapper

use forum_core::entities::User;
use forum_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            display_name: model.display_name,
            email: model.email,
            avatar: model.avatar,
            bio: model.bio,
            banner_color: model.banner_color,
            banner_url: model.banner_url,
            karma: model.karma,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
