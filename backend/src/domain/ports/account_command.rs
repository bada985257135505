//! Driving port for account mutations.
//!
//! Every method takes the authenticated caller explicitly; there is no way to
//! invoke a mutation without one.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, PlainPassword, ProfileChanges, UserId, UserView};

/// Write-side account use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Apply the supplied profile fields to `target`.
    async fn update_profile(
        &self,
        caller: &UserId,
        target: &UserId,
        changes: ProfileChanges,
    ) -> Result<UserView, Error>;

    /// Re-hash and store `password` for `target`.
    ///
    /// Succeeds only when `password` matches the stored credential.
    async fn update_password(
        &self,
        caller: &UserId,
        target: &UserId,
        password: PlainPassword,
    ) -> Result<UserView, Error>;

    /// Record `email` as the pending address for `target` and notify the
    /// current address.
    async fn request_email_change(
        &self,
        caller: &UserId,
        target: &UserId,
        email: EmailAddress,
    ) -> Result<UserView, Error>;
}
