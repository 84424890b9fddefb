use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::Pool;

use crate::{errors::BookingError, repositories::rate_limit::RateLimitStore};

/// Redis-backed sliding window, shared by every server instance.
///
/// Each key gets one counter per fixed window bucket (`{key}:{bucket}`,
/// advanced atomically with `INCR`); the decision weights the previous
/// bucket's count by how much of it still overlaps the trailing window. Store
/// errors propagate and fail the request closed.
#[derive(Clone)]
pub struct RedisRateLimitStore {
    pool: Pool,
}

impl RedisRateLimitStore {
    pub fn new(pool: Pool) -> Self {
        RedisRateLimitStore { pool }
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        window_secs: u64,
        limit: u32,
    ) -> Result<bool, BookingError> {
        let mut conn = self.pool.get().await?;

        let window_ms = (window_secs as i64) * 1000;
        let now_ms = Utc::now().timestamp_millis();
        let bucket = now_ms.div_euclid(window_ms);

        let current_key = format!("{}:{}", key, bucket);
        let previous_key = format!("{}:{}", key, bucket - 1);

        // Counters expire after two windows; by then they can no longer
        // overlap the trailing interval.
        let (current, previous): (u64, Option<u64>) = redis::pipe()
            .atomic()
            .incr(&current_key, 1u32)
            .expire(&current_key, (window_secs * 2) as i64)
            .ignore()
            .get(&previous_key)
            .query_async(&mut conn)
            .await?;

        let effective = effective_count(previous.unwrap_or(0), current, now_ms, window_ms);
        Ok(effective <= limit as f64)
    }
}

/// Weighted request count over the trailing window. `current` already
/// includes the request being decided.
fn effective_count(previous: u64, current: u64, now_ms: i64, window_ms: i64) -> f64 {
    let into_window = now_ms.rem_euclid(window_ms) as f64 / window_ms as f64;
    (previous as f64) * (1.0 - into_window) + current as f64
}
