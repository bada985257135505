//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed account model and the service that
//! applies account operations through the ports in [`ports`]. Types validate
//! on construction; stored rows are rehydrated through crate-private
//! constructors that trust the database.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): account aggregate with credentials.
//! - UserView (alias to `user::UserView`): public projection of a user.
//! - AccountService (alias to `accounts::AccountService`): account operations.
//! - NotificationWorker (alias to `notification_worker::NotificationWorker`):
//!   background mail delivery.

pub mod account_events;
pub mod accounts;
pub mod activation;
pub mod auth;
pub mod error;
pub mod notification_worker;
pub mod password;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_events::{AccountEvent, EmailChangeRequested};
pub use self::accounts::{AccountService, PASSWORD_MISMATCH_MESSAGE, UNAUTHORIZED_ACTION_MESSAGE};
pub use self::activation::{ACTIVATION_CODE_LEN, ActivationCode};
pub use self::auth::{BEARER_SCHEME, BearerToken, BearerTokenError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::notification_worker::{
    DeliveryOutcome, NotificationSleeper, NotificationWorker, RetryPolicy, TokioSleeper,
};
pub use self::password::{
    PASSWORD_MAX, PASSWORD_MIN, PasswordHash, PasswordHashError, PasswordValidationError,
    PlainPassword,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    AVATAR_MAX, Avatar, EMAIL_MAX, EmailAddress, ProfileChanges, USER_NAME_MAX, User, UserId,
    UserName, UserParts, UserValidationError, UserView,
};
