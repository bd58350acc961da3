//! Resolves a token's user id to the current username without a database
//! round trip per request.
//!
//! Entries expire after a TTL and are dropped on profile updates via
//! [`UserIdentityCache::invalidate`]. The cache is bounded: when full, expired
//! entries are purged first and then the oldest entry is evicted.
//!
//! Each invalidation bumps a generation counter for the user's stripe. A
//! load that started before the bump still returns its value but is not
//! cached, so an invalidated username cannot be written back by a slow
//! reader.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use forum_core::{Snowflake, User};

use super::clock::{Clock, SystemClock};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_CAPACITY: usize = 10_000;
const GENERATION_STRIPES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedIdentity {
    pub user_id: Snowflake,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<&User> for CachedIdentity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    identity: CachedIdentity,
    inserted_at: Instant,
}

#[derive(Debug)]
pub struct UserIdentityCache {
    entries: DashMap<Snowflake, Entry>,
    generations: [AtomicU64; GENERATION_STRIPES],
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl UserIdentityCache {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            generations: std::array::from_fn(|_| AtomicU64::new(0)),
            ttl,
            capacity: capacity.max(1),
            clock,
        }
    }

    #[must_use]
    pub fn from_config(config: &forum_common::IdentityCacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.capacity)
    }

    fn generation(&self, user_id: Snowflake) -> &AtomicU64 {
        let stripe = user_id.into_inner().rem_euclid(GENERATION_STRIPES as i64) as usize;
        &self.generations[stripe]
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }

    /// A live entry, or `None` (dropping it if it has expired)
    pub fn get(&self, user_id: Snowflake) -> Option<CachedIdentity> {
        let now = self.clock.now();
        {
            let entry = self.entries.get(&user_id)?;
            if !self.is_expired(&entry, now) {
                return Some(entry.identity.clone());
            }
        }
        self.entries
            .remove_if(&user_id, |_, entry| self.is_expired(entry, now));
        None
    }

    pub fn insert(&self, identity: CachedIdentity) {
        let now = self.clock.now();
        self.reserve(identity.user_id, now);
        self.entries.insert(
            identity.user_id,
            Entry {
                identity,
                inserted_at: now,
            },
        );
    }

    /// Insert unless the user was invalidated since `generation` was read
    fn insert_if_current(&self, identity: CachedIdentity, generation: u64) -> bool {
        let now = self.clock.now();
        let user_id = identity.user_id;
        self.reserve(user_id, now);

        // The shard lock is held across the check, so an invalidation that
        // bumps after it removes this entry once the lock is released.
        let slot = self.entries.entry(user_id);
        if self.generation(user_id).load(Ordering::SeqCst) != generation {
            drop(slot);
            tracing::debug!(user_id = %user_id, "Identity load raced an invalidation; not cached");
            return false;
        }
        slot.insert(Entry {
            identity,
            inserted_at: now,
        });
        true
    }

    fn reserve(&self, user_id: Snowflake, now: Instant) {
        if !self.entries.contains_key(&user_id) && self.entries.len() >= self.capacity {
            self.make_room(now);
        }
    }

    /// Cached identity, or the loader's result (cached when `Some`)
    pub async fn get_or_load<F, Fut, E>(
        &self,
        user_id: Snowflake,
        load: F,
    ) -> Result<Option<CachedIdentity>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<CachedIdentity>, E>>,
    {
        if let Some(identity) = self.get(user_id) {
            return Ok(Some(identity));
        }

        let generation = self.generation(user_id).load(Ordering::SeqCst);
        let loaded = load().await?;
        if let Some(identity) = &loaded {
            self.insert_if_current(identity.clone(), generation);
        }
        Ok(loaded)
    }

    /// Returns whether an entry was present
    pub fn invalidate(&self, user_id: Snowflake) -> bool {
        self.generation(user_id).fetch_add(1, Ordering::SeqCst);
        let removed = self.entries.remove(&user_id).is_some();
        if removed {
            tracing::debug!(user_id = %user_id, "Identity cache entry invalidated");
        }
        removed
    }

    /// Drop every expired entry, returning how many went
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(entry, now));
        before.saturating_sub(self.entries.len())
    }

    fn make_room(&self, now: Instant) {
        let purged = self.purge_expired();
        if self.entries.len() < self.capacity {
            tracing::trace!(purged, "Identity cache made room by purging expired entries");
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| (*entry.key(), entry.value().inserted_at));

        if let Some((user_id, inserted_at)) = oldest {
            self.entries.remove(&user_id);
            tracing::trace!(
                user_id = %user_id,
                age_ms = now.saturating_duration_since(inserted_at).as_millis() as u64,
                "Identity cache evicted oldest entry"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for UserIdentityCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}
