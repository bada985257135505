//! Password value objects.
//!
//! [`PlainPassword`] holds caller-supplied secrets and wipes them on drop.
//! [`PasswordHash`] wraps an Argon2id hash in PHC string format; each call to
//! [`PasswordHash::hash`] draws a fresh salt from the operating system RNG.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// Shortest accepted password, in characters.
pub const PASSWORD_MIN: usize = 8;
/// Longest accepted password, in characters.
pub const PASSWORD_MAX: usize = 128;

/// Validation errors for caller-supplied passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    /// Shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Shortest accepted length.
        min: usize,
    },
    /// Longer than [`PASSWORD_MAX`].
    #[error("password must be at most {max} characters")]
    TooLong {
        /// Longest accepted length.
        max: usize,
    },
}

impl PasswordValidationError {
    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
        }
    }
}

/// Failures raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hasher rejected its input or parameters.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Hasher diagnostic.
        message: String,
    },
}

/// Caller-supplied password, zeroised when dropped.
///
/// Whitespace is significant and preserved.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Validate the length of a password.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordValidationError`] when outside
    /// [`PASSWORD_MIN`]..=[`PASSWORD_MAX`] characters.
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let password = Zeroizing::new(password.into());
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(PasswordValidationError::TooLong { max: PASSWORD_MAX });
        }
        Ok(Self(password))
    }

    /// Borrow the secret.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(<redacted>)")
    }
}

/// Argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a freshly generated salt.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hashing`] when Argon2 rejects the input.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::{PasswordHash, PlainPassword};
    ///
    /// let secret = PlainPassword::new("correct horse").expect("valid password");
    /// let hash = PasswordHash::hash(&secret).expect("hashing succeeds");
    /// assert!(hash.verify(&secret));
    /// assert!(hash.as_phc().starts_with("$argon2id$"));
    /// ```
    pub fn hash(password: &PlainPassword) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a hash read from storage as-is.
    ///
    /// A value that is not an Argon2 PHC string never verifies.
    pub(crate) fn from_stored(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    /// True when `candidate` matches this hash.
    pub fn verify(&self, candidate: &PlainPassword) -> bool {
        match PhcString::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.expose().as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// The PHC string to store.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
