//! Driven port delivering rendered mail.

use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Delivery failures reported by mailer adapters.
    pub enum MailerError {
        /// Delivery may succeed if retried.
        Transient { message: String } => "mail delivery failed temporarily: {message}",
        /// Delivery will not succeed for this message.
        Permanent { message: String } => "mail delivery failed permanently: {message}",
    }
}

/// A rendered message ready for delivery.
#[derive(Clone, PartialEq, Eq)]
pub struct OutboundMail {
    /// Sender address.
    pub from: EmailAddress,
    /// Recipient address.
    pub to: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Plain-text body. May contain secrets such as activation codes.
    pub body: String,
}

impl std::fmt::Debug for OutboundMail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundMail")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Deliver one message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send `mail`, classifying failures as transient or permanent.
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailerError>;
}
