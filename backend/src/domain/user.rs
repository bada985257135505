//! User aggregate and its value objects.
//!
//! Every value object validates on construction, so a [`User`] can only be
//! assembled from well-formed parts. Credentials live on the aggregate but
//! have no path into [`UserView`], the only representation handed to
//! adapters for output.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activation::ActivationCode;
use super::password::PasswordHash;

/// Maximum length of a user name, in characters.
pub const USER_NAME_MAX: usize = 255;
/// Maximum length of an avatar reference, in characters.
pub const AVATAR_MAX: usize = 2048;
/// Maximum length of an email address, in characters.
pub const EMAIL_MAX: usize = 254;

/// Validation errors raised by the user value objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The name was blank.
    #[error("name must not be empty")]
    EmptyName,
    /// The name exceeded [`USER_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Largest accepted length.
        max: usize,
    },
    /// The avatar reference was empty.
    #[error("avatar must not be empty")]
    EmptyAvatar,
    /// The avatar reference exceeded [`AVATAR_MAX`].
    #[error("avatar must be at most {max} characters")]
    AvatarTooLong {
        /// Largest accepted length.
        max: usize,
    },
    /// The avatar reference contained whitespace.
    #[error("avatar must not contain whitespace")]
    AvatarWhitespace,
    /// The email address was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email address was malformed.
    #[error("email must be a valid email address")]
    InvalidEmail,
    /// The email address exceeded [`EMAIL_MAX`].
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Largest accepted length.
        max: usize,
    },
}

impl UserValidationError {
    /// Name of the input field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyAvatar | Self::AvatarTooLong { .. } | Self::AvatarWhitespace => "avatar",
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::EmptyName | Self::EmptyAvatar | Self::EmptyEmail => "empty",
            Self::InvalidId => "invalid_uuid",
            Self::NameTooLong { .. } | Self::AvatarTooLong { .. } | Self::EmailTooLong { .. } => {
                "too_long"
            }
            Self::AvatarWhitespace => "contains_whitespace",
            Self::InvalidEmail => "invalid_format",
        }
    }
}

/// Stable user identifier stored as a UUID.
///
/// Any spelling [`Uuid::parse_str`] accepts is normalised to the lowercase
/// hyphenated form, so equality and hashing follow the UUID value.
///
/// # Examples
/// ```
/// use accounts::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6").is_err());
///
/// let upper = UserId::new("3FA85F64-5717-4562-B3FC-2C963F66AFA6").expect("valid id");
/// assert_eq!(upper, id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyId`] or
    /// [`UserValidationError::InvalidId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Declares a string-backed value object with serde conversions and accessors.
macro_rules! string_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Borrow the validated value.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Wrap a value read from storage without re-validating it.
            pub(crate) fn from_stored(value: impl Into<String>) -> Self {
                Self(value.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = UserValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

string_value!(
    /// Name shown for the user; 1 to [`USER_NAME_MAX`] characters once trimmed.
    UserName
);

impl UserName {
    /// Validate and construct a name. Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyName`] or
    /// [`UserValidationError::NameTooLong`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

string_value!(
    /// Opaque avatar reference such as a URL or storage path.
    Avatar
);

impl Avatar {
    /// Validate and construct an avatar reference.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyAvatar`],
    /// [`UserValidationError::AvatarTooLong`] or
    /// [`UserValidationError::AvatarWhitespace`].
    pub fn new(avatar: impl Into<String>) -> Result<Self, UserValidationError> {
        let avatar = avatar.into();
        if avatar.is_empty() {
            return Err(UserValidationError::EmptyAvatar);
        }
        if avatar.chars().any(char::is_whitespace) {
            return Err(UserValidationError::AvatarWhitespace);
        }
        if avatar.chars().count() > AVATAR_MAX {
            return Err(UserValidationError::AvatarTooLong { max: AVATAR_MAX });
        }
        Ok(Self(avatar))
    }
}

string_value!(
    /// Email address, kept exactly as supplied apart from surrounding
    /// whitespace.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new(" Ada@Example.org ").expect("valid email");
    /// assert_eq!(email.as_str(), "Ada@Example.org");
    /// assert!(EmailAddress::new("ada@localhost").is_err());
    /// ```
    EmailAddress
);

impl EmailAddress {
    /// Validate and construct an email address.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyEmail`],
    /// [`UserValidationError::EmailTooLong`] or
    /// [`UserValidationError::InvalidEmail`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !is_plausible_email(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

fn is_plausible_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() > 1 && labels.iter().all(|label| !label.is_empty())
}

/// Account record owned by the account service.
///
/// ## Invariants
/// - `password` and `activation_code` are never exposed through [`UserView`].
/// - `activation_code` is present whenever `email_update` was set by an
///   email-change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    avatar: Option<Avatar>,
    email: EmailAddress,
    email_update: Option<EmailAddress>,
    password: PasswordHash,
    activation_code: Option<ActivationCode>,
}

/// Every field of a [`User`], used by adapters that rehydrate stored rows.
#[derive(Debug, Clone)]
pub struct UserParts {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub name: UserName,
    /// Optional avatar reference.
    pub avatar: Option<Avatar>,
    /// Confirmed email address.
    pub email: EmailAddress,
    /// Email address awaiting confirmation.
    pub email_update: Option<EmailAddress>,
    /// Stored password hash.
    pub password: PasswordHash,
    /// Code confirming the pending email change.
    pub activation_code: Option<ActivationCode>,
}

/// Profile fields a caller may change; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    /// Replacement name.
    pub name: Option<UserName>,
    /// Replacement avatar reference.
    pub avatar: Option<Avatar>,
}

impl ProfileChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar.is_none()
    }
}

impl User {
    /// Create a user without avatar or pending email change.
    pub fn new(id: UserId, name: UserName, email: EmailAddress, password: PasswordHash) -> Self {
        Self::from_parts(UserParts {
            id,
            name,
            avatar: None,
            email,
            email_update: None,
            password,
            activation_code: None,
        })
    }

    /// Rebuild a user from stored parts.
    pub fn from_parts(parts: UserParts) -> Self {
        let UserParts {
            id,
            name,
            avatar,
            email,
            email_update,
            password,
            activation_code,
        } = parts;
        Self {
            id,
            name,
            avatar,
            email,
            email_update,
            password,
            activation_code,
        }
    }

    /// Decompose the user for persistence.
    pub fn into_parts(self) -> UserParts {
        UserParts {
            id: self.id,
            name: self.name,
            avatar: self.avatar,
            email: self.email,
            email_update: self.email_update,
            password: self.password,
            activation_code: self.activation_code,
        }
    }

    /// Attach an avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar: Avatar) -> Self {
        self.avatar = Some(avatar);
        self
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Avatar reference, if set.
    pub fn avatar(&self) -> Option<&Avatar> {
        self.avatar.as_ref()
    }

    /// Confirmed email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Email address awaiting confirmation.
    pub fn email_update(&self) -> Option<&EmailAddress> {
        self.email_update.as_ref()
    }

    /// Stored password hash.
    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    /// Code confirming the pending email change.
    pub fn activation_code(&self) -> Option<&ActivationCode> {
        self.activation_code.as_ref()
    }

    /// Apply the supplied profile fields.
    pub fn apply_profile(&mut self, changes: ProfileChanges) {
        let ProfileChanges { name, avatar } = changes;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(avatar) = avatar {
            self.avatar = Some(avatar);
        }
    }

    /// Replace the stored password hash.
    pub fn set_password(&mut self, password: PasswordHash) {
        self.password = password;
    }

    /// Record a pending email change, replacing any earlier request.
    pub fn request_email_change(&mut self, email: EmailAddress, code: ActivationCode) {
        self.email_update = Some(email);
        self.activation_code = Some(code);
    }

    /// Public representation of this user.
    pub fn view(&self) -> UserView {
        UserView::from(self)
    }
}

/// Public representation of a [`User`].
///
/// Built only from a [`User`]; it has no fields for credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub name: UserName,
    /// Avatar reference, if set.
    pub avatar: Option<Avatar>,
    /// Confirmed email address.
    pub email: EmailAddress,
    /// Email address awaiting confirmation.
    pub email_update: Option<EmailAddress>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            email: user.email.clone(),
            email_update: user.email_update.clone(),
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
            email: user.email,
            email_update: user.email_update,
        }
    }
}
