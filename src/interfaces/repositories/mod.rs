pub mod mailer;
pub mod rate_limit;
