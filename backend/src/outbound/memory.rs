//! In-memory [`UserRepository`] used when no database is configured.
//!
//! Users are kept in insertion order. The lock is never held across an
//! `.await`.

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use pagination::PageRequest;
use serde::Deserialize;
use tracing::info;

use crate::domain::ports::{UserPage, UserPersistenceError, UserRepository};
use crate::domain::{Avatar, EmailAddress, PasswordHash, PlainPassword, User, UserId, UserName};

/// Failure to load seed users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {message}")]
    Read { path: String, message: String },
    #[error("invalid seed file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid seed user {email}: {message}")]
    User { email: String, message: String },
}

/// One entry of a seed file. The password is hashed on load.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl TryFrom<SeedUser> for User {
    type Error = SeedError;

    fn try_from(seed: SeedUser) -> Result<Self, Self::Error> {
        let email_label = seed.email.clone();
        let invalid = |message: String| SeedError::User {
            email: email_label.clone(),
            message,
        };
        let name = UserName::new(seed.name).map_err(|err| invalid(err.to_string()))?;
        let email = EmailAddress::new(seed.email).map_err(|err| invalid(err.to_string()))?;
        let secret = PlainPassword::new(seed.password).map_err(|err| invalid(err.to_string()))?;
        let password = PasswordHash::hash(&secret).map_err(|err| invalid(err.to_string()))?;
        let user = Self::new(seed.id, name, email, password);
        match seed.avatar {
            Some(avatar) => Avatar::new(avatar)
                .map(|avatar| user.with_avatar(avatar))
                .map_err(|err| invalid(err.to_string())),
            None => Ok(user),
        }
    }
}

/// Vector-backed user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

fn poisoned<T>(_: PoisonError<T>) -> UserPersistenceError {
    UserPersistenceError::query("user store lock poisoned")
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `users` in the given order.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }

    /// Load users from a JSON array of [`SeedUser`] entries.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] when the file is unreadable, malformed, or an
    /// entry fails validation.
    pub fn from_seed_file(path: &Path) -> Result<Self, SeedError> {
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|err| SeedError::Read {
            path: shown.clone(),
            message: err.to_string(),
        })?;
        let seeds: Vec<SeedUser> = serde_json::from_str(&raw).map_err(|err| SeedError::Parse {
            path: shown.clone(),
            message: err.to_string(),
        })?;
        let users = seeds
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        info!(path = %shown, users = users.len(), "seeded in-memory user store");
        Ok(Self::with_users(users))
    }

    /// Append a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserPersistenceError::Query`] when the id or email is taken.
    pub fn insert(&self, user: User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users
            .iter()
            .any(|existing| existing.id() == user.id() || existing.email() == user.email())
        {
            return Err(UserPersistenceError::query("unique constraint violated"));
        }
        users.push(user);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }

    async fn list_page(&self, page: &PageRequest) -> Result<UserPage, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(UserPage {
            users: users.iter().skip(offset).take(limit).cloned().collect(),
            total: users.len() as u64,
        })
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let slot = users
            .iter_mut()
            .find(|existing| existing.id() == user.id())
            .ok_or_else(|| UserPersistenceError::not_found(user.id().to_string()))?;
        *slot = user.clone();
        Ok(())
    }
}
