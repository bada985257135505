//! Driven port publishing account events.

use async_trait::async_trait;

use crate::domain::AccountEvent;

use super::define_port_error;

define_port_error! {
    /// Failures raised when an event cannot be handed off.
    pub enum EventPublishError {
        /// Every consumer has gone away.
        Closed => "account event channel is closed",
        /// The adapter refused the event.
        Rejected { message: String } => "account event rejected: {message}",
    }
}

/// Hand account events to their consumers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountEventPublisher: Send + Sync {
    /// Publish `event`, waiting for capacity when the adapter is bounded.
    async fn publish(&self, event: AccountEvent) -> Result<(), EventPublishError>;
}
