//! Events emitted by the account service after a committed write.
//!
//! Events are transport agnostic. The notification worker renders them into
//! mail; other consumers can subscribe to the same publisher port.

use super::activation::ActivationCode;
use super::trace_id::TraceId;
use super::user::{EmailAddress, User, UserId, UserName};

/// A pending email change was recorded for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailChangeRequested {
    /// Correlation identifier of the request that caused the change.
    pub trace_id: Option<TraceId>,
    /// Account the change belongs to.
    pub user_id: UserId,
    /// Name used to greet the recipient.
    pub name: UserName,
    /// Current, confirmed address; the notification goes here.
    pub current_email: EmailAddress,
    /// Address awaiting confirmation.
    pub pending_email: EmailAddress,
    /// Code confirming the change.
    pub activation_code: ActivationCode,
}

impl EmailChangeRequested {
    /// Build the event from a user that has just recorded a pending change.
    ///
    /// Returns `None` when the user has no pending change.
    pub fn from_user(user: &User) -> Option<Self> {
        let pending_email = user.email_update()?.clone();
        let activation_code = user.activation_code()?.clone();
        Some(Self {
            trace_id: TraceId::current(),
            user_id: user.id().clone(),
            name: user.name().clone(),
            current_email: user.email().clone(),
            pending_email,
            activation_code,
        })
    }
}

/// Account events published through
/// [`AccountEventPublisher`](super::ports::AccountEventPublisher).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountEvent {
    /// See [`EmailChangeRequested`].
    EmailChangeRequested(EmailChangeRequested),
}

impl AccountEvent {
    /// Account the event concerns.
    pub fn user_id(&self) -> &UserId {
        match self {
            Self::EmailChangeRequested(event) => &event.user_id,
        }
    }

    /// Correlation identifier captured when the event was raised.
    pub fn trace_id(&self) -> Option<TraceId> {
        match self {
            Self::EmailChangeRequested(event) => event.trace_id,
        }
    }

    /// Short event name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmailChangeRequested(_) => "email_change_requested",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordHash, PlainPassword};
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        let password = PlainPassword::new("initial-secret").expect("valid password");
        User::new(
            UserId::random(),
            UserName::new("Grace").expect("valid name"),
            EmailAddress::new("grace@example.org").expect("valid email"),
            PasswordHash::hash(&password).expect("hash"),
        )
    }

    #[rstest]
    fn no_event_without_a_pending_change(user: User) {
        assert!(EmailChangeRequested::from_user(&user).is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn event_addresses_current_email_and_captures_trace(user: User) {
        let mut user = user;
        let code = ActivationCode::generate();
        user.request_email_change(
            EmailAddress::new("hopper@example.org").expect("valid email"),
            code.clone(),
        );
        let trace_id = TraceId::generate();
        let event = TraceId::scope(trace_id, async { EmailChangeRequested::from_user(&user) })
            .await
            .expect("pending change produces an event");

        assert_eq!(event.current_email.as_str(), "grace@example.org");
        assert_eq!(event.pending_email.as_str(), "hopper@example.org");
        assert_eq!(event.activation_code, code);
        assert_eq!(event.trace_id, Some(trace_id));

        let wrapped = AccountEvent::EmailChangeRequested(event);
        assert_eq!(wrapped.user_id(), user.id());
        assert_eq!(wrapped.kind(), "email_change_requested");
    }
}
