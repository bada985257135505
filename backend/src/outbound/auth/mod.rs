//! Credential and permission adapters.

mod owner_only;
mod static_tokens;

pub use owner_only::OwnerOnlyAuthorizer;
pub use static_tokens::{StaticTokenAuthenticator, TokenFileError, token_fingerprint};
