//! Event and mail adapters for the notification path.
//!
//! [`notification_channel`] links the account service to the
//! [`NotificationWorker`](crate::domain::NotificationWorker): the publisher
//! half goes into the service and the receiver half into the worker.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::domain::AccountEvent;
use crate::domain::ports::{AccountEventPublisher, EventPublishError, Mailer, MailerError, OutboundMail};

/// Default bound on queued events.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct ChannelEventPublisher {
    sender: mpsc::Sender<AccountEvent>,
}

/// Create a bounded channel; `publish` waits while it is full.
///
/// # Examples
/// ```
/// use accounts::outbound::notify::notification_channel;
///
/// let (publisher, receiver) = notification_channel(8);
/// # drop((publisher, receiver));
/// ```
pub fn notification_channel(capacity: usize) -> (ChannelEventPublisher, mpsc::Receiver<AccountEvent>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (ChannelEventPublisher { sender }, receiver)
}

#[async_trait]
impl AccountEventPublisher for ChannelEventPublisher {
    async fn publish(&self, event: AccountEvent) -> Result<(), EventPublishError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| EventPublishError::closed())
    }
}

/// [`Mailer`] that records deliveries in the log instead of sending them.
///
/// Only the sender, recipient and subject are logged; the body carries the
/// activation code and is never written out.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailerError> {
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            "mail delivered to log"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ActivationCode, EmailAddress, EmailChangeRequested, UserId, UserName,
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn event() -> AccountEvent {
        AccountEvent::EmailChangeRequested(EmailChangeRequested {
            trace_id: None,
            user_id: UserId::random(),
            name: UserName::new("Ada").expect("fixture name"),
            current_email: EmailAddress::new("ada@example.org").expect("fixture email"),
            pending_email: EmailAddress::new("countess@example.org").expect("fixture email"),
            activation_code: ActivationCode::generate(),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn published_events_reach_the_receiver(event: AccountEvent) {
        let (publisher, mut receiver) = notification_channel(4);
        publisher.publish(event.clone()).await.expect("channel open");
        assert_eq!(receiver.recv().await, Some(event));
    }

    #[rstest]
    #[tokio::test]
    async fn publishing_after_the_worker_stops_fails(event: AccountEvent) {
        let (publisher, receiver) = notification_channel(4);
        drop(receiver);
        assert_eq!(
            publisher.publish(event).await,
            Err(EventPublishError::closed())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn receiver_closes_when_publishers_drop() {
        let (publisher, mut receiver) = notification_channel(4);
        drop(publisher);
        assert!(receiver.recv().await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn tracing_mailer_accepts_every_mail() {
        let mail = OutboundMail {
            from: EmailAddress::new("no-reply@localhost.test").expect("fixture email"),
            to: EmailAddress::new("ada@example.org").expect("fixture email"),
            subject: "Your account was updated".to_owned(),
            body: "code".to_owned(),
        };
        assert!(TracingMailer.send(&mail).await.is_ok());
    }
}
