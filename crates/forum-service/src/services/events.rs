//! Best-effort fan-out of domain events over Redis pub/sub

use forum_cache::PubSubChannel;
use forum_core::DomainEvent;
use tracing::{debug, warn};

use super::context::ServiceContext;

/// Publish after the change has committed, off the request path.
/// A failed publish is logged and otherwise ignored.
pub(crate) fn publish(ctx: &ServiceContext, channel: PubSubChannel, event: DomainEvent) {
    let publisher = ctx.publisher().clone();
    tokio::spawn(async move {
        match publisher.publish_domain_event(&channel, &event).await {
            Ok(receivers) => debug!(
                channel = %channel,
                event_type = event.event_type(),
                receivers,
                "Event published"
            ),
            Err(e) => warn!(
                error = %e,
                channel = %channel,
                event_type = event.event_type(),
                "Event publish failed"
            ),
        }
    });
}
