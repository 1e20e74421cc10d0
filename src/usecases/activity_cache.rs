//! Activity Cache - Last Seen Bets per Market
//!
//! Remembers the most recent bet snapshot of each market so the poll
//! loop can skip markets with no new activity. Bounded two ways:
//! - capacity: the least recently touched market is evicted on overflow
//! - TTL: entries not touched within `ttl` are treated as absent and
//!   dropped when read
//!
//! Owned by the poll loop; no interior locking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::domain::market::{BetSnapshot, MarketId};

/// Result of comparing a fresh snapshot against the cached one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
  /// Nothing (live) was cached for the market.
  FirstSeen,
  /// The snapshot differs from the cached one; the cache now holds the new one.
  Changed,
  /// The snapshot equals the cached one.
  Unchanged,
}

struct CacheEntry {
  snapshot: BetSnapshot,
  touched_at: Instant,
  /// Monotonic touch order, used for eviction.
  touch_seq: u64,
}

impl CacheEntry {
  fn is_expired(&self, ttl: Duration) -> bool {
    self.touched_at.elapsed() > ttl
  }
}

/// Per-market snapshot cache with capacity and TTL bounds.
pub struct ActivityCache {
  entries: HashMap<MarketId, CacheEntry>,
  capacity: usize,
  ttl: Duration,
  next_seq: u64,
}

impl ActivityCache {
  /// Create a cache holding at most `capacity` markets (minimum 1).
  pub fn new(capacity: usize, ttl: Duration) -> Self {
    Self {
      entries: HashMap::new(),
      capacity: capacity.max(1),
      ttl,
      next_seq: 0,
    }
  }

  /// Cache sized so that no market polled in one iteration is evicted
  /// or expired before the next.
  pub fn from_config(config: &AppConfig) -> Self {
    let (capacity, ttl) = config.cache_bounds();
    Self::new(capacity, ttl)
  }

  /// Cached snapshot of `market_id`, dropping it first if expired.
  pub fn get(&mut self, market_id: &str) -> Option<&BetSnapshot> {
    let ttl = self.ttl;
    if self
      .entries
      .get(market_id)
      .is_some_and(|entry| entry.is_expired(ttl))
    {
      self.entries.remove(market_id);
      return None;
    }
    self.entries.get(market_id).map(|entry| &entry.snapshot)
  }

  /// Store `snapshot` for `market_id`, replacing any previous one.
  pub fn put(&mut self, market_id: MarketId, snapshot: BetSnapshot) {
    let touch_seq = self.bump();
    self.entries.insert(
      market_id,
      CacheEntry {
        snapshot,
        touched_at: Instant::now(),
        touch_seq,
      },
    );
    self.evict_overflow();
  }

  /// Compare `snapshot` with the cached one and store it.
  ///
  /// Comparison is by value: same bets in the same order.
  pub fn observe(&mut self, market_id: &str, snapshot: BetSnapshot) -> Observation {
    let ttl = self.ttl;
    let touch_seq = self.bump();

    if let Some(entry) = self
      .entries
      .get_mut(market_id)
      .filter(|entry| !entry.is_expired(ttl))
    {
      entry.touched_at = Instant::now();
      entry.touch_seq = touch_seq;
      if entry.snapshot == snapshot {
        return Observation::Unchanged;
      }
      entry.snapshot = snapshot;
      return Observation::Changed;
    }

    self.put(market_id.to_string(), snapshot);
    Observation::FirstSeen
  }

  /// Drop every expired entry. Returns how many were removed.
  pub fn purge_expired(&mut self) -> usize {
    let ttl = self.ttl;
    let before = self.entries.len();
    self.entries.retain(|_, entry| !entry.is_expired(ttl));
    before - self.entries.len()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub const fn capacity(&self) -> usize {
    self.capacity
  }

  fn bump(&mut self) -> u64 {
    self.next_seq += 1;
    self.next_seq
  }

  fn evict_overflow(&mut self) {
    while self.entries.len() > self.capacity {
      let oldest = self
        .entries
        .iter()
        .min_by_key(|(_, entry)| entry.touch_seq)
        .map(|(id, _)| id.clone());
      match oldest {
        Some(id) => {
          self.entries.remove(&id);
        }
        None => break,
      }
    }
  }
}
