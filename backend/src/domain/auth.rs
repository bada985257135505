//! Authentication primitives.
//!
//! Inbound adapters parse the `Authorization` header into a [`BearerToken`]
//! before asking the [`Authenticator`](super::ports::Authenticator) port who
//! the caller is.

use std::fmt;

use zeroize::Zeroizing;

/// Scheme prefix expected in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Reasons an `Authorization` header value is not a usable bearer token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerTokenError {
    /// The value does not use the bearer scheme.
    #[error("authorization scheme must be Bearer")]
    WrongScheme,
    /// The token part is missing or blank.
    #[error("bearer token must not be empty")]
    Empty,
}

/// Opaque bearer credential, zeroised when dropped.
///
/// # Examples
/// ```
/// use accounts::domain::BearerToken;
///
/// let token = BearerToken::from_header_value("Bearer abc123").expect("valid header");
/// assert_eq!(token.expose(), "abc123");
/// assert!(BearerToken::from_header_value("Basic abc123").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Wrap a raw token.
    ///
    /// # Errors
    ///
    /// Returns [`BearerTokenError::Empty`] for blank input.
    pub fn new(token: impl Into<String>) -> Result<Self, BearerTokenError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(BearerTokenError::Empty);
        }
        Ok(Self(token))
    }

    /// Parse an `Authorization` header value of the form `Bearer <token>`.
    ///
    /// The scheme is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`BearerTokenError`] when the scheme or token is missing.
    pub fn from_header_value(value: &str) -> Result<Self, BearerTokenError> {
        let (scheme, token) = value
            .trim()
            .split_once(' ')
            .ok_or(BearerTokenError::WrongScheme)?;
        if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            return Err(BearerTokenError::WrongScheme);
        }
        Self::new(token.trim())
    }

    /// Borrow the raw token.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}
