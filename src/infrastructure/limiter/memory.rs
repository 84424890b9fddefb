use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

use crate::{errors::BookingError, repositories::rate_limit::RateLimitStore};

/// Sliding window over two adjacent fixed windows: the previous window's
/// count is weighted by how much of it still overlaps the trailing interval.
#[derive(Debug)]
pub struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: Instant::now(),
            current_count: 0,
            prev_count: 0,
        }
    }

    fn allow(&mut self) -> bool {
        let now = Instant::now();
        let mut elapsed = now.duration_since(self.current_window_start);

        if elapsed >= self.window_size {
            // More than one full window idle means the previous count no
            // longer overlaps the trailing interval at all.
            self.prev_count = if elapsed >= self.window_size * 2 {
                0
            } else {
                self.current_count
            };
            self.current_count = 0;
            self.current_window_start = now;
            elapsed = Duration::ZERO;
        }

        let weight = elapsed.as_secs_f64() / self.window_size.as_secs_f64();
        let effective = (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64);

        if effective < self.limit as f64 {
            self.current_count += 1;
            true
        } else {
            false
        }
    }
}

struct Entry {
    window: SlidingWindow,
    last_seen: Instant,
}

/// Process-local `RateLimitStore`. Counters are not shared across server
/// instances, so this is only correct for tests and single-process
/// development; production uses the Redis-backed store.
#[derive(Clone)]
pub struct MemoryRateLimitStore {
    map: Arc<DashMap<String, Arc<Mutex<Entry>>>>,
}

impl MemoryRateLimitStore {
    /// `entry_ttl` bounds how long an idle key keeps its counters around
    /// before the eviction task drops it.
    pub fn new(entry_ttl: Duration) -> Self {
        let store = Self {
            map: Arc::new(DashMap::new()),
        };

        {
            let map_clone = store.map.clone();
            tokio::spawn(async move {
                let interval = Duration::from_secs(30);
                loop {
                    sleep(interval).await;
                    let now = Instant::now();
                    let stale: Vec<String> = map_clone
                        .iter()
                        .filter_map(|entry| {
                            let e = entry.value().lock();
                            if now.duration_since(e.last_seen) > entry_ttl {
                                Some(entry.key().clone())
                            } else {
                                None
                            }
                        })
                        .collect();

                    for key in stale {
                        map_clone.remove(&key);
                    }
                }
            });
        }

        store
    }

    fn entry(&self, key: &str, window_secs: u64, limit: u32) -> Arc<Mutex<Entry>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }

        let fresh = Arc::new(Mutex::new(Entry {
            window: SlidingWindow::new(Duration::from_secs(window_secs), limit as u64),
            last_seen: Instant::now(),
        }));
        match self.map.entry(key.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(fresh.clone());
                fresh
            }
        }
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        window_secs: u64,
        limit: u32,
    ) -> Result<bool, BookingError> {
        let entry = self.entry(key, window_secs, limit);
        let mut e = entry.lock();
        e.last_seen = Instant::now();
        Ok(e.window.allow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_then_denies() {
        let mut window = SlidingWindow::new(Duration::from_secs(60), 5);
        for _ in 0..5 {
            assert!(window.allow());
        }
        assert!(!window.allow());
        assert!(!window.allow());
    }

    #[tokio::test]
    async fn keys_are_limited_independently() {
        let store = MemoryRateLimitStore::new(Duration::from_secs(300));

        for _ in 0..5 {
            assert!(store.check_and_increment("ip:a", 60, 5).await.unwrap());
        }
        assert!(!store.check_and_increment("ip:a", 60, 5).await.unwrap());

        assert!(store.check_and_increment("ip:b", 60, 5).await.unwrap());
    }
}
