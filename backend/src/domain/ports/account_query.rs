//! Driving port for account reads.
//!
//! Inbound adapters depend on this trait rather than on the service type so
//! handlers can be tested against a mock.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, UserId, UserView};

/// Read-side account use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// The authenticated caller's own account.
    async fn get_self(&self, caller: &UserId) -> Result<UserView, Error>;

    /// One page of accounts; `page` is 1-based.
    async fn list_users(&self, page: u32) -> Result<Page<UserView>, Error>;

    /// A single account by id.
    async fn get_user(&self, id: &UserId) -> Result<UserView, Error>;
}
