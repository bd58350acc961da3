//! Notification service
//!
//! Reading and managing a user's notifications, plus the fire-and-forget
//! delivery used by other services.

use forum_core::{DomainError, Notification, Snowflake};
use tracing::{debug, instrument, warn};

use crate::dto::{MessageResponse, NotificationListResponse, NotificationResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub const NOTIFICATION_LIST_LIMIT: i64 = 50;

/// Store a notification in the background.
///
/// Never blocks or fails the caller; storage errors are logged. `None`
/// (a self-notification) is a no-op.
pub fn dispatch(ctx: &ServiceContext, notification: Option<Notification>) {
    let Some(notification) = notification else {
        return;
    };
    let ctx = ctx.clone();
    tokio::spawn(async move {
        deliver(&ctx, &notification).await;
    });
}

/// Store a notification now, logging instead of propagating failures
pub async fn deliver(ctx: &ServiceContext, notification: &Notification) {
    match ctx.notification_repo().create(notification).await {
        Ok(()) => debug!(
            notification_id = %notification.id,
            recipient = %notification.user_id,
            kind = notification.kind.as_str(),
            "Notification stored"
        ),
        Err(e) => warn!(
            error = %e,
            recipient = %notification.user_id,
            kind = notification.kind.as_str(),
            "Failed to store notification"
        ),
    }
}

pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Snowflake) -> ServiceResult<NotificationListResponse> {
        let repo = self.ctx.notification_repo();
        let notifications = repo.list_for_user(user_id, NOTIFICATION_LIST_LIMIT).await?;
        let unread_count = repo.unread_count(user_id).await?;

        Ok(NotificationListResponse {
            notifications: notifications.iter().map(NotificationResponse::from).collect(),
            unread_count,
        })
    }

    /// Only the recipient can mark a notification; anyone else gets 404
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: Snowflake, id: Snowflake) -> ServiceResult<MessageResponse> {
        if !self.ctx.notification_repo().mark_read(id, user_id).await? {
            return Err(DomainError::NotificationNotFound(id).into());
        }
        Ok(MessageResponse::new("Notification marked as read"))
    }

    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: Snowflake) -> ServiceResult<MessageResponse> {
        let updated = self.ctx.notification_repo().mark_all_read(user_id).await?;
        debug!(user_id = %user_id, updated, "Marked all notifications read");
        Ok(MessageResponse::new("All notifications marked as read"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Snowflake, id: Snowflake) -> ServiceResult<MessageResponse> {
        if !self.ctx.notification_repo().delete(id, user_id).await? {
            return Err(DomainError::NotificationNotFound(id).into());
        }
        Ok(MessageResponse::new("Notification deleted"))
    }
}
