//! Service settings loaded via OrthoConfig.
//!
//! Sources, lowest precedence first: config file, `ACCOUNTS_*` environment
//! variables, command-line flags. Unset values fall back to the defaults
//! below; accessors validate on read.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE};
use serde::Deserialize;

use crate::domain::EmailAddress;
use crate::outbound::notify::DEFAULT_QUEUE_CAPACITY;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAIL_FROM: &str = "no-reply@accounts.local";
const DEFAULT_MAIL_MAX_ATTEMPTS: u32 = 5;

/// A setting holds a value the service cannot use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid setting {name}: {message}")]
pub struct SettingsError {
    name: &'static str,
    message: String,
}

impl SettingsError {
    fn new(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
        }
    }

    /// Name of the offending setting.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Account service configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct AccountsSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Accounts per listing page.
    pub page_size: Option<u32>,
    /// Bound on queued account events.
    pub notification_queue_capacity: Option<usize>,
    /// Delivery attempts per notification, including the first.
    #[ortho_config(default = 5)]
    pub mail_max_attempts: u32,
    /// Sender address for notifications.
    pub mail_from: Option<String>,
    /// JSON map of bearer token to user id.
    pub api_tokens_file: Option<PathBuf>,
    /// JSON list of users for the in-memory store.
    pub seed_users_file: Option<PathBuf>,
}

impl Default for AccountsSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            page_size: None,
            notification_queue_capacity: None,
            mail_max_attempts: DEFAULT_MAIL_MAX_ATTEMPTS,
            mail_from: None,
            api_tokens_file: None,
            seed_users_file: None,
        }
    }
}

impl AccountsSettings {
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::new("bind_addr", err.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`SettingsError`] unless the size is within `1..=100`.
    pub fn page_size(&self) -> Result<u32, SettingsError> {
        let size = self.page_size.unwrap_or(DEFAULT_PER_PAGE);
        if (1..=MAX_PER_PAGE).contains(&size) {
            Ok(size)
        } else {
            Err(SettingsError::new(
                "page_size",
                format!("must be between 1 and {MAX_PER_PAGE}"),
            ))
        }
    }

    /// # Errors
    ///
    /// Returns [`SettingsError`] for a zero capacity.
    pub fn notification_queue_capacity(&self) -> Result<usize, SettingsError> {
        match self.notification_queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY) {
            0 => Err(SettingsError::new(
                "notification_queue_capacity",
                "must be at least 1",
            )),
            capacity => Ok(capacity),
        }
    }

    /// # Errors
    ///
    /// Returns [`SettingsError`] for zero attempts.
    pub fn mail_max_attempts(&self) -> Result<u32, SettingsError> {
        match self.mail_max_attempts {
            0 => Err(SettingsError::new("mail_max_attempts", "must be at least 1")),
            attempts => Ok(attempts),
        }
    }

    /// # Errors
    ///
    /// Returns [`SettingsError`] when the address is not a valid email.
    pub fn mail_from(&self) -> Result<EmailAddress, SettingsError> {
        EmailAddress::new(self.mail_from.as_deref().unwrap_or(DEFAULT_MAIL_FROM))
            .map_err(|err| SettingsError::new("mail_from", err.to_string()))
    }

    /// Check every setting once so startup fails fast.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.bind_addr()?;
        self.page_size()?;
        self.notification_queue_capacity()?;
        self.mail_max_attempts()?;
        self.mail_from()?;
        Ok(())
    }
}
