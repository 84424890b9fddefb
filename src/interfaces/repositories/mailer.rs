use async_trait::async_trait;

use crate::errors::BookingError;

/// One outbound transactional email. Sender and recipient are configuration
/// owned by the mailer, never taken from the request.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub subject: String,
    pub text: String,
    /// Submitter address, so a plain reply in the recipient's mail client
    /// goes back to them.
    pub reply_to: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), BookingError>;
}
