//! Driven port resolving bearer credentials to callers.

use async_trait::async_trait;

use crate::domain::{BearerToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by authenticator adapters.
    pub enum AuthenticatorError {
        /// The identity provider could not be reached.
        Unavailable { message: String } => "authenticator unavailable: {message}",
    }
}

/// Resolve the caller behind a bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return the caller's id, or `None` when the token is not recognised.
    async fn authenticate(&self, token: &BearerToken)
    -> Result<Option<UserId>, AuthenticatorError>;
}
