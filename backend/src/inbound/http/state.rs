//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, AccountQuery, Authenticator};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Resolves bearer tokens to callers.
    pub authenticator: Arc<dyn Authenticator>,
    /// Read-side account operations.
    pub accounts: Arc<dyn AccountQuery>,
    /// Write-side account operations.
    pub account_commands: Arc<dyn AccountCommand>,
}

impl HttpState {
    /// Bundle the ports used by the account handlers.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::AccountService;
    /// use accounts::inbound::http::state::HttpState;
    /// use accounts::outbound::auth::{OwnerOnlyAuthorizer, StaticTokenAuthenticator};
    /// use accounts::outbound::memory::InMemoryUserRepository;
    /// use accounts::outbound::notify::notification_channel;
    ///
    /// let (publisher, _receiver) = notification_channel(8);
    /// let service = Arc::new(AccountService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(OwnerOnlyAuthorizer),
    ///     Arc::new(publisher),
    /// ));
    /// let state = HttpState::new(
    ///     Arc::new(StaticTokenAuthenticator::default()),
    ///     service.clone(),
    ///     service,
    /// );
    /// # let _ = state;
    /// ```
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        accounts: Arc<dyn AccountQuery>,
        account_commands: Arc<dyn AccountCommand>,
    ) -> Self {
        Self {
            authenticator,
            accounts,
            account_commands,
        }
    }
}
