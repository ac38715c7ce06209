//! Result cache: LRU-capped, TTL-expired, swept lazily against an injectable clock.

use super::result::AnalysisBatchResult;
use crate::analyzers::AnalysisLevel;
use crate::knowledge::HexagramId;
use crate::profile::ProfileSet;
use lru::LruCache;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Millisecond time source for TTL checks.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_ms(&self) -> u64;
}

/// Monotonic clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub engine: HexagramId,
    pub interface: HexagramId,
    pub safe_mode: HexagramId,
    pub level: AnalysisLevel,
}

impl CacheKey {
    /// Keys are built from sanitized ids, so an out-of-range id and hexagram 1
    /// share an entry.
    pub fn new(profiles: &ProfileSet, level: AnalysisLevel) -> Self {
        let [engine, interface, safe_mode] = profiles.sanitized().ids();
        Self {
            engine,
            interface,
            safe_mode,
            level,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.engine, self.interface, self.safe_mode, self.level
        )
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: AnalysisBatchResult,
    pub created_at_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Fresh entries pushed out by the capacity limit.
    pub evictions: u64,
    /// Stale entries removed by lookups or sweeps.
    pub expired: u64,
    pub size: usize,
}

pub struct AnalysisCache {
    entries: LruCache<CacheKey, CacheEntry>,
    ttl_ms: u64,
    sweep_interval_ms: u64,
    last_sweep_ms: u64,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl AnalysisCache {
    pub fn new(
        capacity: usize,
        ttl: Duration,
        sweep_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let last_sweep_ms = clock.now_ms();
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            ttl_ms: ttl.as_millis() as u64,
            sweep_interval_ms: sweep_interval.as_millis() as u64,
            last_sweep_ms,
            clock,
            stats: CacheStats::default(),
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: u64) -> bool {
        now.saturating_sub(entry.created_at_ms) < self.ttl_ms
    }

    fn maybe_sweep(&mut self, now: u64) {
        if now.saturating_sub(self.last_sweep_ms) >= self.sweep_interval_ms {
            self.sweep_at(now);
        }
    }

    /// Fresh hit promotes the entry; a stale one is dropped and counts as a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<AnalysisBatchResult> {
        let now = self.clock.now_ms();
        self.maybe_sweep(now);

        match self.entries.peek(key).map(|entry| self.is_fresh(entry, now)) {
            Some(true) => {
                self.stats.hits += 1;
                self.entries.get(key).map(|e| e.result.clone())
            }
            Some(false) => {
                self.entries.pop(key);
                self.stats.expired += 1;
                self.stats.misses += 1;
                debug!("cache entry {} expired", key);
                None
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// At capacity, stale entries are purged before the LRU evicts a fresh one.
    pub fn insert(&mut self, key: CacheKey, result: AnalysisBatchResult) {
        let now = self.clock.now_ms();
        self.maybe_sweep(now);

        if !self.entries.contains(&key) && self.entries.len() >= self.entries.cap().get() {
            self.sweep_at(now);
        }

        let entry = CacheEntry {
            result,
            created_at_ms: now,
        };
        if let Some((evicted, _)) = self.entries.push(key, entry) {
            if evicted != key {
                self.stats.evictions += 1;
                debug!("cache evicted {} to make room for {}", evicted, key);
            }
        }
    }

    /// Removes every stale entry; returns how many went.
    pub fn sweep(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.sweep_at(now)
    }

    fn sweep_at(&mut self, now: u64) -> usize {
        self.last_sweep_ms = now;
        let stale: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| !self.is_fresh(entry, now))
            .map(|(key, _)| *key)
            .collect();
        for key in &stale {
            self.entries.pop(key);
        }
        self.stats.expired += stale.len() as u64;
        if !stale.is_empty() {
            debug!("cache sweep removed {} stale entries", stale.len());
        }
        stale.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            ..self.stats
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("len", &self.entries.len())
            .field("cap", &self.entries.cap())
            .field("ttl_ms", &self.ttl_ms)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    fn cache(clock: &Arc<ManualClock>) -> AnalysisCache {
        AnalysisCache::new(100, TTL, Duration::from_secs(60), clock.clone())
    }

    fn key(n: u32) -> CacheKey {
        CacheKey {
            engine: n % 64 + 1,
            interface: n / 64 + 1,
            safe_mode: 1,
            level: AnalysisLevel::Standard,
        }
    }

    fn result() -> AnalysisBatchResult {
        AnalysisBatchResult::failed("placeholder", 0)
    }

    #[test]
    fn hit_within_ttl_and_miss_after() {
        let clock = Arc::new(ManualClock::new());
        let mut c = cache(&clock);
        c.insert(key(0), result());
        clock.advance(Duration::from_secs(299));
        assert!(c.get(&key(0)).is_some());
        clock.advance(Duration::from_secs(1));
        assert!(c.get(&key(0)).is_none());
        let stats = c.stats();
        assert_eq!((stats.hits, stats.misses, stats.expired), (1, 1, 1));
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn all_stale_entries_are_purged_before_inserting() {
        let clock = Arc::new(ManualClock::new());
        let mut c = cache(&clock);
        for n in 0..100 {
            c.insert(key(n), result());
        }
        clock.advance(TTL + Duration::from_secs(1));
        c.insert(key(100), result());
        assert_eq!(c.len(), 1);
        assert_eq!(c.stats().evictions, 0);
        assert_eq!(c.stats().expired, 100);
    }

    #[test]
    fn fresh_overflow_evicts_least_recently_used() {
        let clock = Arc::new(ManualClock::new());
        let mut c = cache(&clock);
        for n in 0..101 {
            c.insert(key(n), result());
        }
        assert_eq!(c.len(), 100);
        assert_eq!(c.stats().evictions, 1);
        assert!(c.get(&key(0)).is_none());
        assert!(c.get(&key(100)).is_some());
    }

    #[test]
    fn stale_half_goes_first_when_full() {
        let clock = Arc::new(ManualClock::new());
        let mut c = cache(&clock);
        for n in 0..50 {
            c.insert(key(n), result());
        }
        clock.advance(Duration::from_secs(200));
        for n in 50..100 {
            c.insert(key(n), result());
        }
        clock.advance(Duration::from_secs(101));
        c.insert(key(100), result());
        assert_eq!(c.len(), 51);
        assert_eq!(c.stats().evictions, 0);
        assert!(c.get(&key(75)).is_some());
    }

    #[test]
    fn reinserting_a_key_is_not_an_eviction() {
        let clock = Arc::new(ManualClock::new());
        let mut c = cache(&clock);
        c.insert(key(1), result());
        c.insert(key(1), result());
        assert_eq!(c.len(), 1);
        assert_eq!(c.stats().evictions, 0);
    }

    #[test]
    fn key_uses_sanitized_ids() {
        let a = CacheKey::new(&ProfileSet::from_ids(99, 2, 3), AnalysisLevel::Essential);
        let b = CacheKey::new(&ProfileSet::from_ids(1, 2, 3), AnalysisLevel::Essential);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "1-2-3-essential");
    }
}
