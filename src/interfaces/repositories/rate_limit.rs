use async_trait::async_trait;

use crate::errors::BookingError;

/// Shared request counter consulted before dispatching an inquiry.
///
/// Implementations must be safe to call from concurrently running server
/// instances: the decision has to reflect every request for `key` within the
/// trailing window, regardless of which process handled it. The Redis-backed
/// store satisfies that; the in-memory one is only suitable for tests and
/// single-process development.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Records one request for `key` and reports whether it is still within
    /// `limit` requests per trailing `window_secs` seconds.
    async fn check_and_increment(
        &self,
        key: &str,
        window_secs: u64,
        limit: u32,
    ) -> Result<bool, BookingError>;
}
