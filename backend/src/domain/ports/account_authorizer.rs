//! Driven port deciding whether a caller may modify an account.

use async_trait::async_trait;

use crate::domain::{User, UserId};

/// Authorization policy for account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountAuthorizer: Send + Sync {
    /// True when `caller` may update `target`.
    async fn can_update(&self, caller: &UserId, target: &User) -> bool;
}
