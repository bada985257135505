//! Bearer tokens resolved from a fixed table.
//!
//! Tokens are kept only as SHA-256 fingerprints. The token file is a JSON
//! object mapping raw tokens to user ids:
//!
//! ```json
//! { "alice-token": "3fa85f64-5717-4562-b3fc-2c963f66afa6" }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{Authenticator, AuthenticatorError};
use crate::domain::{BearerToken, UserId};

/// Failure to load the token file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenFileError {
    #[error("failed to read token file {path}: {message}")]
    Read { path: String, message: String },
    #[error("invalid token file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Lowercase hex SHA-256 of a raw token.
///
/// # Examples
/// ```
/// use accounts::outbound::auth::token_fingerprint;
///
/// let fp = token_fingerprint("alice-token");
/// assert_eq!(fp.len(), 64);
/// assert_ne!(fp, token_fingerprint("bob-token"));
/// ```
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// [`Authenticator`] backed by an in-memory fingerprint table.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    fingerprints: HashMap<String, UserId>,
}

impl StaticTokenAuthenticator {
    /// Build from raw `(token, user)` pairs; the raw tokens are not kept.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (T, UserId)>,
        T: AsRef<str>,
    {
        let fingerprints = tokens
            .into_iter()
            .map(|(token, id)| (token_fingerprint(token.as_ref()), id))
            .collect();
        Self { fingerprints }
    }

    /// Load the token table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`TokenFileError`] when the file cannot be read or is not a
    /// map of tokens to valid user ids.
    pub fn from_file(path: &Path) -> Result<Self, TokenFileError> {
        let shown = path.display().to_string();
        let raw = Zeroizing::new(std::fs::read_to_string(path).map_err(|err| {
            TokenFileError::Read {
                path: shown.clone(),
                message: err.to_string(),
            }
        })?);
        let tokens: HashMap<String, UserId> =
            serde_json::from_str(&raw).map_err(|err| TokenFileError::Parse {
                path: shown.clone(),
                message: err.to_string(),
            })?;
        let authenticator = Self::from_tokens(tokens);
        debug!(path = %shown, tokens = authenticator.len(), "loaded bearer tokens");
        Ok(authenticator)
    }

    /// Number of configured tokens.
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(
        &self,
        token: &BearerToken,
    ) -> Result<Option<UserId>, AuthenticatorError> {
        Ok(self
            .fingerprints
            .get(&token_fingerprint(token.expose()))
            .cloned())
    }
}
