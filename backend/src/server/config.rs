//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use accounts::outbound::auth::StaticTokenAuthenticator;
use accounts::outbound::memory::InMemoryUserRepository;
use accounts::outbound::persistence::DbPool;
use pagination::DEFAULT_PER_PAGE;

/// Where accounts are stored.
#[derive(Clone)]
pub enum UserStore {
    Postgres(DbPool),
    Memory(Arc<InMemoryUserRepository>),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: UserStore,
    pub(crate) authenticator: StaticTokenAuthenticator,
    pub(crate) page_size: u32,
}

impl ServerConfig {
    /// Serve an empty in-memory store with no accepted tokens.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            store: UserStore::Memory(Arc::new(InMemoryUserRepository::new())),
            authenticator: StaticTokenAuthenticator::default(),
            page_size: DEFAULT_PER_PAGE,
        }
    }

    #[must_use]
    pub fn with_store(mut self, store: UserStore) -> Self {
        self.store = store;
        self
    }

    #[must_use]
    pub fn with_authenticator(mut self, authenticator: StaticTokenAuthenticator) -> Self {
        self.authenticator = authenticator;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
