//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`AccountQuery`], [`AccountCommand`]) are implemented by
//! the domain and consumed by inbound adapters. Driven ports are implemented
//! by outbound adapters and consumed by the domain.

mod macros;
pub(crate) use macros::define_port_error;

mod account_authorizer;
mod account_command;
mod account_event_publisher;
mod account_query;
mod authenticator;
mod mailer;
mod user_repository;

#[cfg(test)]
pub use account_authorizer::MockAccountAuthorizer;
pub use account_authorizer::AccountAuthorizer;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_event_publisher::MockAccountEventPublisher;
pub use account_event_publisher::{AccountEventPublisher, EventPublishError};
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::{Authenticator, AuthenticatorError};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{Mailer, MailerError, OutboundMail};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPage, UserPersistenceError, UserRepository};
