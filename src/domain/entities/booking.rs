use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single booking/inquiry submission. Lives for the duration of one
/// request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingSubmission {
    #[validate(length(min = 2, max = 80))]
    pub name: String,

    #[validate(email, length(max = 200))]
    pub email: String,

    #[validate(length(min = 10, max = 4000))]
    pub message: String,

    /// Honeypot. Hidden from humans on the form; must stay empty.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub company: String,

    /// Epoch milliseconds captured client-side on the first submit attempt.
    #[serde(rename = "startedAt")]
    pub started_at: i64,
}

impl BookingSubmission {
    /// Trims all string fields, mirroring what the form does before posting.
    /// Run before validation so length rules apply to the trimmed values.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.message = self.message.trim().to_string();
        self.company = self.company.trim().to_string();
        self
    }
}

/// The only wire contract between client and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        ResponseEnvelope {
            ok: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        ResponseEnvelope {
            ok: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
