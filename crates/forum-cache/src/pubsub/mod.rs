//! Redis Pub/Sub for cross-instance event fan-out

mod channels;
mod publisher;

pub use channels::{
    PubSubChannel, COMMUNITY_CHANNEL_PREFIX, POST_CHANNEL_PREFIX, USER_CHANNEL_PREFIX,
};
pub use publisher::{PubSubEvent, Publisher};
