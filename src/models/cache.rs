//! Bounded in-memory cache with a fixed time-to-live.
//!
//! Keys are ticker symbols, uppercased before every lookup; surrounding
//! whitespace is left to callers. An entry stops being served once
//! `now - inserted_at >= ttl`.
//! When a new key arrives and the cache is full, expired entries are purged
//! first; if it is still full, the entry with the oldest insertion time is
//! evicted (ties go to the lowest insertion sequence number).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::models::quote::Quote;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cache configuration.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Maximum number of live entries (values below 1 are raised to 1)
    pub capacity: usize,
    /// Time-to-live in seconds
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl_seconds: 60,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    seq: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}

struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    next_seq: u64,
}

/// Thread-safe TTL cache keyed by case-insensitive symbol.
pub struct TtlCache<V, C = SystemClock> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
    ttl: Duration,
    clock: C,
}

/// Cache of simplified quotes used by the service.
pub type QuoteCache = TtlCache<Quote>;

pub(crate) fn normalize_key(symbol: &str) -> String {
    symbol.to_uppercase()
}

impl<V: Clone> TtlCache<V, SystemClock> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, SystemClock)
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.ttl_seconds))
    }
}

impl<V: Clone, C: Clock> TtlCache<V, C> {
    pub fn with_clock(capacity: usize, ttl: Duration, clock: C) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity),
                next_seq: 0,
            }),
            capacity,
            ttl,
            clock,
        }
    }

    /// Returns the cached value for `symbol` if it has not expired.
    ///
    /// An expired entry is dropped on the way out.
    pub fn get(&self, symbol: &str) -> Option<V> {
        let key = normalize_key(symbol);
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let expired = inner.entries.get(&key)?.is_expired(now, self.ttl);
        if expired {
            inner.entries.remove(&key);
            debug!(symbol = %key, "Cache entry expired");
            return None;
        }
        inner.entries.get(&key).map(|e| e.value.clone())
    }

    /// Inserts or replaces the value for `symbol`, stamping the current time.
    pub fn put(&self, symbol: &str, value: V) {
        let key = normalize_key(symbol);
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            let ttl = self.ttl;
            inner.entries.retain(|_, e| !e.is_expired(now, ttl));

            if inner.entries.len() >= self.capacity {
                let victim = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| (e.inserted_at, e.seq))
                    .map(|(k, _)| k.clone());
                if let Some(victim) = victim {
                    inner.entries.remove(&victim);
                    debug!(evicted = %victim, "Cache full, evicted oldest entry");
                }
            }
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                seq,
            },
        );
    }

    pub fn remove(&self, symbol: &str) -> Option<V> {
        self.inner
            .lock()
            .entries
            .remove(&normalize_key(symbol))
            .map(|e| e.value)
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, e| !e.is_expired(now, ttl));
        before - inner.entries.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let inner = self.inner.lock();
        let expired = inner
            .entries
            .values()
            .filter(|e| e.is_expired(now, self.ttl))
            .count();
        CacheStats {
            total_entries: inner.entries.len(),
            expired_entries: expired,
            live_entries: inner.entries.len() - expired,
            capacity: self.capacity,
        }
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub live_entries: usize,
    pub capacity: usize,
}

/// Manually advanced clock for tests.
#[cfg(test)]
#[derive(Clone)]
pub(crate) struct ManualClock {
    base: Instant,
    offset: std::sync::Arc<Mutex<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: std::sync::Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock to `secs` seconds after its creation.
    pub(crate) fn set_secs(&self, secs: u64) {
        *self.offset.lock() = Duration::from_secs(secs);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}
