//! Email-change activation codes.

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};

/// Length of every activation code.
pub const ACTIVATION_CODE_LEN: usize = 40;

/// Opaque token confirming a pending email change.
///
/// # Examples
/// ```
/// use accounts::domain::{ActivationCode, ACTIVATION_CODE_LEN};
///
/// let code = ActivationCode::generate();
/// assert_eq!(code.as_str().len(), ACTIVATION_CODE_LEN);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ActivationCode(String);

impl ActivationCode {
    /// Draw a new code from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let code = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ACTIVATION_CODE_LEN)
            .map(char::from)
            .collect();
        Self(code)
    }

    /// Wrap a code read from storage as-is.
    pub(crate) fn from_stored(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ActivationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActivationCode(<redacted>)")
    }
}
