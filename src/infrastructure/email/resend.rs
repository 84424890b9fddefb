use async_trait::async_trait;
use serde::Serialize;

use crate::{
    errors::BookingError,
    repositories::mailer::{Mailer, OutboundEmail},
};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// `Mailer` backed by the Resend transactional email HTTP API.
pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
    from: String,
    to: String,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl ResendMailer {
    pub fn new(http: reqwest::Client, api_key: String, from: String, to: String) -> Self {
        ResendMailer {
            http,
            api_key,
            from,
            to,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), BookingError> {
        let payload = SendEmailRequest {
            from: &self.from,
            to: [self.to.as_str()],
            reply_to: &email.reply_to,
            subject: &email.subject,
            text: &email.text,
        };

        let response = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "resend rejected the email: {}", body);
            return Err(BookingError::Dispatch(format!(
                "provider responded with {}",
                status
            )));
        }

        Ok(())
    }
}
