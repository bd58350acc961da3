//! # forum-cache
//!
//! Redis connection pool, refresh token store, vote-count pub/sub, and the
//! in-process identity cache used by bearer-token authentication.

pub mod identity;
pub mod pool;
pub mod pubsub;
pub mod session;

pub use identity::{CachedIdentity, Clock, ManualClock, SystemClock, UserIdentityCache};
pub use pool::{create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, SharedRedisPool};
pub use pubsub::{PubSubChannel, PubSubEvent, Publisher};
pub use session::{RefreshTokenData, RefreshTokenStore};
