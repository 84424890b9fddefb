use chrono::Utc;

use crate::entities::booking::{BookingSubmission, ResponseEnvelope};

/// What the user typed into the form. `company` is the hidden honeypot and
/// stays empty for humans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    pub name: String,
    pub email: String,
    pub message: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Sending,
    Success { message: String },
    Error { message: String },
}

/// Form-controller counterpart of the booking endpoint.
///
/// Mirrors the browser form's behavior: `startedAt` is stamped on the first
/// submit attempt (not on construction), the draft is cleared only on
/// success, and every failure mode (network, non-2xx, unparseable body) lands
/// in `Error` with a human-readable message. No automatic retry; both
/// terminal states accept a resubmit.
pub struct BookingClient {
    http: reqwest::Client,
    endpoint: String,
    started_at: i64,
    state: FormState,
    pub draft: FormDraft,
}

impl BookingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        BookingClient {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/booking", base_url.into()),
            started_at: 0,
            state: FormState::Idle,
            draft: FormDraft::default(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub async fn submit(&mut self) -> &FormState {
        if self.state == FormState::Sending {
            return &self.state;
        }

        if self.started_at == 0 {
            self.started_at = Utc::now().timestamp_millis();
        }

        let payload = BookingSubmission {
            name: self.draft.name.trim().to_string(),
            email: self.draft.email.trim().to_string(),
            message: self.draft.message.trim().to_string(),
            company: self.draft.company.trim().to_string(),
            started_at: self.started_at,
        };

        self.state = FormState::Sending;

        self.state = match self.http.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => {
                let status = response.status();
                match response.json::<ResponseEnvelope>().await {
                    Ok(envelope) if status.is_success() && envelope.ok => {
                        self.draft = FormDraft::default();
                        FormState::Success {
                            message: envelope
                                .message
                                .unwrap_or_else(|| "Message sent. I'll get back to you soon.".to_string()),
                        }
                    }
                    Ok(envelope) => FormState::Error {
                        message: envelope
                            .error
                            .unwrap_or_else(|| "Server returned an unexpected response.".to_string()),
                    },
                    Err(_) => FormState::Error {
                        message: "Server returned an unexpected response.".to_string(),
                    },
                }
            }
            Err(_) => FormState::Error {
                message: "Network error. Please try again in a moment.".to_string(),
            },
        };

        &self.state
    }
}
