use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    entities::booking::BookingSubmission,
    errors::BookingError,
    repositories::{
        mailer::{Mailer, OutboundEmail},
        rate_limit::RateLimitStore,
    },
    spam::is_suspected_bot,
};

const RATE_LIMIT: u32 = 5;
const RATE_WINDOW_SECS: u64 = 60;
const RATE_KEY_PREFIX: &str = "rl:booking";

/// What happened to an accepted submission. Both outcomes are HTTP 200; the
/// client-facing message differs so a real sender gets real confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    /// A bot heuristic fired. Pretend success, dispatch nothing.
    Absorbed,
    /// The inquiry email went out.
    Dispatched,
}

/// Orchestrates one submission: validate, run bot heuristics, consult the
/// rate limiter, dispatch the inquiry email.
pub struct BookingHandler {
    rate_limiter: Arc<dyn RateLimitStore>,
    /// Absent when email settings are incomplete (non-production only; in
    /// production configuration validation refuses to start without them).
    mailer: Option<Arc<dyn Mailer>>,
}

impl BookingHandler {
    pub fn new(rate_limiter: Arc<dyn RateLimitStore>, mailer: Option<Arc<dyn Mailer>>) -> Self {
        BookingHandler {
            rate_limiter,
            mailer,
        }
    }

    pub async fn submit(
        &self,
        submission: BookingSubmission,
        client_ip: &str,
    ) -> Result<BookingOutcome, BookingError> {
        let submission = submission.normalized();
        submission.validate()?;

        if is_suspected_bot(&submission, Utc::now().timestamp_millis()) {
            tracing::info!(ip = %client_ip, "absorbed suspected bot submission");
            return Ok(BookingOutcome::Absorbed);
        }

        // Heuristic rejections above do not consume rate-limit budget.
        let key = format!("{}:ip:{}", RATE_KEY_PREFIX, urlencoding::encode(client_ip));
        let allowed = self
            .rate_limiter
            .check_and_increment(&key, RATE_WINDOW_SECS, RATE_LIMIT)
            .await?;
        if !allowed {
            return Err(BookingError::RateLimited);
        }

        let mailer = self.mailer.as_ref().ok_or(BookingError::Misconfigured)?;
        let email = inquiry_email(&submission, client_ip, Utc::now());
        mailer.send(&email).await?;

        tracing::info!(ip = %client_ip, "booking inquiry dispatched");
        Ok(BookingOutcome::Dispatched)
    }
}

/// Plain-text rendering of an inquiry, with the observed IP and send time so
/// the recipient can judge suspicious traffic without server access.
fn inquiry_email(
    submission: &BookingSubmission,
    client_ip: &str,
    sent_at: DateTime<Utc>,
) -> OutboundEmail {
    let text = [
        "New booking/inquiry message",
        "",
        &format!("Name: {}", submission.name),
        &format!("Email: {}", submission.email),
        "",
        "Message:",
        &submission.message,
        "",
        &format!("IP: {}", client_ip),
        &format!("Time: {}", sent_at.to_rfc3339()),
    ]
    .join("\n");

    OutboundEmail {
        subject: format!("New booking inquiry — {}", submission.name),
        text,
        reply_to: submission.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{mailer::MockMailer, rate_limit::MockRateLimitStore};
    use chrono::TimeZone;

    fn valid_submission() -> BookingSubmission {
        BookingSubmission {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            message: "I'd like to book you for a festival slot in June.".into(),
            company: String::new(),
            // Far in the past, comfortably over the elapsed-time floor.
            started_at: 1_000,
        }
    }

    fn allowing_limiter() -> MockRateLimitStore {
        let mut limiter = MockRateLimitStore::new();
        limiter
            .expect_check_and_increment()
            .returning(|_, _, _| Ok(true));
        limiter
    }

    #[tokio::test]
    async fn dispatches_a_valid_submission_with_reply_to_set() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email: &OutboundEmail| {
                email.reply_to == "ada@example.com"
                    && email.subject.contains("Ada Lovelace")
                    && email.text.contains("festival slot")
            })
            .times(1)
            .returning(|_| Ok(()));

        let handler = BookingHandler::new(Arc::new(allowing_limiter()), Some(Arc::new(mailer)));
        let outcome = handler.submit(valid_submission(), "203.0.113.7").await;
        assert_eq!(outcome.unwrap(), BookingOutcome::Dispatched);
    }

    #[tokio::test]
    async fn invalid_fields_never_reach_limiter_or_mailer() {
        let mut limiter = MockRateLimitStore::new();
        limiter.expect_check_and_increment().times(0);
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let handler = BookingHandler::new(Arc::new(limiter), Some(Arc::new(mailer)));

        let mut submission = valid_submission();
        submission.email = "not-an-email".into();
        let result = handler.submit(submission, "203.0.113.7").await;
        assert!(matches!(result, Err(BookingError::Validation(_))));
    }

    #[tokio::test]
    async fn honeypot_is_absorbed_without_side_effects() {
        let mut limiter = MockRateLimitStore::new();
        limiter.expect_check_and_increment().times(0);
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let handler = BookingHandler::new(Arc::new(limiter), Some(Arc::new(mailer)));

        let mut submission = valid_submission();
        submission.company = "Acme Corp".into();
        let outcome = handler.submit(submission, "203.0.113.7").await.unwrap();
        assert_eq!(outcome, BookingOutcome::Absorbed);
    }

    #[tokio::test]
    async fn too_fast_submission_is_absorbed() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let handler = BookingHandler::new(
            Arc::new(MockRateLimitStore::new()),
            Some(Arc::new(mailer)),
        );

        let mut submission = valid_submission();
        submission.started_at = Utc::now().timestamp_millis();
        let outcome = handler.submit(submission, "203.0.113.7").await.unwrap();
        assert_eq!(outcome, BookingOutcome::Absorbed);
    }

    #[tokio::test]
    async fn denied_rate_limit_is_surfaced_before_dispatch() {
        let mut limiter = MockRateLimitStore::new();
        limiter
            .expect_check_and_increment()
            .withf(|key, window, limit| {
                key == "rl:booking:ip:203.0.113.7"
                    && *window == RATE_WINDOW_SECS
                    && *limit == RATE_LIMIT
            })
            .returning(|_, _, _| Ok(false));
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let handler = BookingHandler::new(Arc::new(limiter), Some(Arc::new(mailer)));
        let result = handler.submit(valid_submission(), "203.0.113.7").await;
        assert!(matches!(result, Err(BookingError::RateLimited)));
    }

    #[tokio::test]
    async fn missing_mailer_is_a_misconfiguration() {
        let handler = BookingHandler::new(Arc::new(allowing_limiter()), None);
        let result = handler.submit(valid_submission(), "203.0.113.7").await;
        assert!(matches!(result, Err(BookingError::Misconfigured)));
    }

    #[tokio::test]
    async fn provider_failure_becomes_dispatch_error() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(BookingError::Dispatch("provider 503".into())));

        let handler = BookingHandler::new(Arc::new(allowing_limiter()), Some(Arc::new(mailer)));
        let result = handler.submit(valid_submission(), "203.0.113.7").await;
        assert!(matches!(result, Err(BookingError::Dispatch(_))));
    }

    #[test]
    fn inquiry_email_embeds_ip_and_timestamp() {
        let sent_at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let email = inquiry_email(&valid_submission(), "203.0.113.7", sent_at);

        assert!(email.text.contains("Name: Ada Lovelace"));
        assert!(email.text.contains("IP: 203.0.113.7"));
        assert!(email.text.contains("Time: 2026-03-14T09:26:53+00:00"));
    }
}
