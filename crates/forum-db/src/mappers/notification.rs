//! Notification entity <-> model mapper

use forum_core::entities::{Notification, NotificationType};
use forum_core::value_objects::Snowflake;

use crate::models::NotificationModel;

fn parse_notification_type(raw: &str) -> NotificationType {
    raw.parse().unwrap_or(NotificationType::Mention)
}

impl From<NotificationModel> for Notification {
    fn from(model: NotificationModel) -> Self {
        Notification {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            kind: parse_notification_type(&model.kind),
            message: model.message,
            link: model.link,
            from_user_id: model.from_user_id.map(Snowflake::new),
            from_username: model.from_username,
            related_post_id: model.related_post_id.map(Snowflake::new),
            related_comment_id: model.related_comment_id.map(Snowflake::new),
            read: model.read,
            created_at: model.created_at,
        }
    }
}
