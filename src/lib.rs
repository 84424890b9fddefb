use std::{sync::Arc, time::Duration};

use deadpool_redis::Pool as RedisPool;

mod domain;
mod infrastructure;
mod interfaces;

pub mod client;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, spam, use_cases};
pub use infrastructure::{email, limiter, utils};
pub use interfaces::{handlers, repositories, routes};

use email::resend::ResendMailer;
use limiter::{memory::MemoryRateLimitStore, redis::RedisRateLimitStore};
use repositories::{mailer::Mailer, rate_limit::RateLimitStore};
use use_cases::booking::BookingHandler;

/// Idle in-memory rate-limit counters are evicted after this long.
const MEMORY_LIMITER_TTL: Duration = Duration::from_secs(10 * 60);

pub struct AppState {
    pub booking_handler: BookingHandler,
    pub config: settings::AppConfig,
    pub redis_pool: Option<RedisPool>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Self {
        let redis_pool = config.redis_url.as_ref().and_then(|url| {
            deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .map_err(|e| tracing::error!("Redis pool creation error: {}", e))
                .ok()
        });

        let rate_limiter: Arc<dyn RateLimitStore> = match &redis_pool {
            Some(pool) => Arc::new(RedisRateLimitStore::new(pool.clone())),
            None => {
                tracing::warn!(
                    "Redis not configured; using in-process rate limiting. \
                     Counters are not shared across instances."
                );
                Arc::new(MemoryRateLimitStore::new(MEMORY_LIMITER_TTL))
            }
        };

        let mailer: Option<Arc<dyn Mailer>> = match config.email_settings() {
            Some(email) => Some(Arc::new(ResendMailer::new(
                reqwest::Client::new(),
                email.api_key,
                email.from,
                email.to,
            ))),
            None => {
                tracing::warn!(
                    "Email settings incomplete; booking submissions will fail until \
                     RESEND_API_KEY, BOOKING_TO_EMAIL, and BOOKING_FROM_EMAIL are set."
                );
                None
            }
        };

        AppState {
            booking_handler: BookingHandler::new(rate_limiter, mailer),
            config: config.clone(),
            redis_pool,
        }
    }
}
