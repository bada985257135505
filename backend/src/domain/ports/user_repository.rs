//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The row to update no longer exists.
        NotFound { id: String } => "user {id} not found",
    }
}

/// One page of users plus the total number of stored users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Users on the requested page, in storage order.
    pub users: Vec<User>,
    /// Number of users across all pages.
    pub total: u64,
}

/// Driven port over the user store.
///
/// Listing order is ascending creation order with ties broken by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch one page of users.
    async fn list_page(&self, page: &PageRequest) -> Result<UserPage, UserPersistenceError>;

    /// Persist every mutable field of an existing user.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] when the user has been
    /// removed since it was read.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;
}
