//! Account service implementing the account driving ports.
//!
//! Mutations follow one sequence: load the target, check the caller may act
//! on it, apply the change, persist once, re-read. Every failure aborts
//! before the write. Events are published after the write; a publish
//! failure is logged and does not fail the request.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{DEFAULT_PER_PAGE, Page, PageRequest, PageRequestError};
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::ports::{
    AccountAuthorizer, AccountCommand, AccountEventPublisher, AccountQuery, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    AccountEvent, ActivationCode, EmailAddress, EmailChangeRequested, Error, PasswordHash,
    PlainPassword, ProfileChanges, TraceId, User, UserId, UserView,
};

/// Message returned when an update is refused by the authorizer.
pub const UNAUTHORIZED_ACTION_MESSAGE: &str = "This action is unauthorized.";

/// Message returned when the supplied password does not match the account.
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Password did not match against the account.";

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::NotFound { id } => Error::not_found(format!("user {id} not found")),
    }
}

fn map_page_error(error: PageRequestError) -> Error {
    Error::validation_failed(error.to_string()).with_details(json!({
        "field": "page",
        "code": "out_of_range",
    }))
}

/// Account service backed by a user repository, an authorizer and an event
/// publisher.
#[derive(Clone)]
pub struct AccountService<R, A, P> {
    users: Arc<R>,
    authorizer: Arc<A>,
    events: Arc<P>,
    per_page: u32,
}

impl<R, A, P> AccountService<R, A, P> {
    /// Create a service listing [`DEFAULT_PER_PAGE`] users per page.
    pub fn new(users: Arc<R>, authorizer: Arc<A>, events: Arc<P>) -> Self {
        Self {
            users,
            authorizer,
            events,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Override the listing page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `per_page` is zero or above
    /// [`pagination::MAX_PER_PAGE`].
    pub fn with_page_size(mut self, per_page: u32) -> Result<Self, PageRequestError> {
        PageRequest::first(per_page)?;
        self.per_page = per_page;
        Ok(self)
    }
}

impl<R, A, P> AccountService<R, A, P>
where
    R: UserRepository,
    A: AccountAuthorizer,
    P: AccountEventPublisher,
{
    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn ensure_can_update(&self, caller: &UserId, target: &User) -> Result<(), Error> {
        if self.authorizer.can_update(caller, target).await {
            Ok(())
        } else {
            debug!(caller = %caller, target = %target.id(), "account update denied");
            Err(Error::forbidden(UNAUTHORIZED_ACTION_MESSAGE))
        }
    }

    async fn persist_and_reload(&self, user: &User) -> Result<UserView, Error> {
        self.users
            .update(user)
            .await
            .map_err(map_user_persistence_error)?;
        self.load(user.id()).await.map(UserView::from)
    }

    async fn publish(&self, event: AccountEvent) {
        let user_id = event.user_id().clone();
        let kind = event.kind();
        if let Err(err) = self.events.publish(event).await {
            error!(
                error = %err,
                user_id = %user_id,
                event = kind,
                trace_id = ?TraceId::current().map(|id| id.to_string()),
                "failed to publish account event"
            );
        }
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| Error::internal(format!("blocking task failed: {err}")))
}

#[async_trait]
impl<R, A, P> AccountQuery for AccountService<R, A, P>
where
    R: UserRepository,
    A: AccountAuthorizer,
    P: AccountEventPublisher,
{
    async fn get_self(&self, caller: &UserId) -> Result<UserView, Error> {
        self.load(caller).await.map(UserView::from)
    }

    async fn list_users(&self, page: u32) -> Result<Page<UserView>, Error> {
        let request = PageRequest::new(page, self.per_page).map_err(map_page_error)?;
        let listing = self
            .users
            .list_page(&request)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(Page::new(listing.users, request, listing.total).map(UserView::from))
    }

    async fn get_user(&self, id: &UserId) -> Result<UserView, Error> {
        self.load(id).await.map(UserView::from)
    }
}

#[async_trait]
impl<R, A, P> AccountCommand for AccountService<R, A, P>
where
    R: UserRepository,
    A: AccountAuthorizer,
    P: AccountEventPublisher,
{
    async fn update_profile(
        &self,
        caller: &UserId,
        target: &UserId,
        changes: ProfileChanges,
    ) -> Result<UserView, Error> {
        let mut user = self.load(target).await?;
        self.ensure_can_update(caller, &user).await?;
        if changes.is_empty() {
            return Ok(user.view());
        }
        user.apply_profile(changes);
        let view = self.persist_and_reload(&user).await?;
        info!(user_id = %target, "profile updated");
        Ok(view)
    }

    async fn update_password(
        &self,
        caller: &UserId,
        target: &UserId,
        password: PlainPassword,
    ) -> Result<UserView, Error> {
        let mut user = self.load(target).await?;

        let stored = user.password().clone();
        let (matches, password) = run_blocking(move || {
            let matches = stored.verify(&password);
            (matches, password)
        })
        .await?;
        if !matches {
            debug!(user_id = %target, "password proof rejected");
            return Err(Error::forbidden(PASSWORD_MISMATCH_MESSAGE));
        }

        self.ensure_can_update(caller, &user).await?;

        let rehashed = run_blocking(move || PasswordHash::hash(&password))
            .await?
            .map_err(|err| Error::internal(err.to_string()))?;
        user.set_password(rehashed);
        let view = self.persist_and_reload(&user).await?;
        info!(user_id = %target, "password updated");
        Ok(view)
    }

    async fn request_email_change(
        &self,
        caller: &UserId,
        target: &UserId,
        email: EmailAddress,
    ) -> Result<UserView, Error> {
        let mut user = self.load(target).await?;
        self.ensure_can_update(caller, &user).await?;

        user.request_email_change(email, ActivationCode::generate());
        self.users
            .update(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %target, "email change requested");

        match EmailChangeRequested::from_user(&user) {
            Some(event) => self.publish(AccountEvent::EmailChangeRequested(event)).await,
            None => error!(user_id = %target, "pending email change missing after update"),
        }

        self.load(target).await.map(UserView::from)
    }
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
