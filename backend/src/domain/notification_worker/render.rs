//! Mail templates for account events.

use crate::domain::ports::OutboundMail;
use crate::domain::{AccountEvent, EmailAddress};

/// Subject used for account change notifications.
pub const ACCOUNT_UPDATED_SUBJECT: &str = "Your account was updated";

/// Render `event` into a message sent from `from`.
///
/// Email change notices go to the current, confirmed address.
pub fn render(event: &AccountEvent, from: &EmailAddress) -> OutboundMail {
    match event {
        AccountEvent::EmailChangeRequested(change) => OutboundMail {
            from: from.clone(),
            to: change.current_email.clone(),
            subject: ACCOUNT_UPDATED_SUBJECT.to_owned(),
            body: format!(
                "Hello {name},\n\n\
                 A request was made to change the email address on your account to {pending}.\n\
                 Use this activation code to confirm the change: {code}\n\n\
                 If you did not ask for this, you can ignore this message.\n",
                name = change.name,
                pending = change.pending_email,
                code = change.activation_code.as_str(),
            ),
        },
    }
}
