use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Uniform response returned when a bot heuristic fires. Same shape as a real
/// success so automated clients cannot tell they were detected.
pub const MSG_ABSORBED: &str = "Thanks!";
pub const MSG_DISPATCHED: &str = "Message sent. Thanks — I'll reply soon.";

pub const ERR_INVALID_PAYLOAD: &str = "Invalid payload.";
pub const ERR_RATE_LIMITED: &str = "Too many requests. Try again in a minute.";
pub const ERR_MISCONFIGURED: &str = "Server is not configured for email sending.";
pub const ERR_UNEXPECTED: &str = "Unexpected server error.";
