//! Authorization rule: accounts are changed only by their owners.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::AccountAuthorizer;
use crate::domain::{User, UserId};

/// Allows an update iff the caller is the target account.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOnlyAuthorizer;

#[async_trait]
impl AccountAuthorizer for OwnerOnlyAuthorizer {
    async fn can_update(&self, caller: &UserId, target: &User) -> bool {
        let allowed = caller == target.id();
        if !allowed {
            debug!(caller = %caller, target = %target.id(), "update denied");
        }
        allowed
    }
}
