//! In-process cache of authenticated user identities

mod clock;
mod user_identity;

pub use clock::{Clock, ManualClock, SystemClock};
pub use user_identity::{CachedIdentity, UserIdentityCache};
