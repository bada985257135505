//! Diesel row structs. Internal to the persistence layer.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ActivationCode, Avatar, EmailAddress, PasswordHash, User, UserId, UserName, UserParts,
};

use super::schema::users;

/// A row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub email: String,
    pub email_update: Option<String>,
    pub password: String,
    pub activation_code: Option<String>,
}

/// Rows are trusted: registration happens elsewhere and may store values the
/// inbound validators would reject, such as undotted email domains.
impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self::from_parts(UserParts {
            id: UserId::from_uuid(row.id),
            name: UserName::from_stored(row.name),
            avatar: row.avatar.map(Avatar::from_stored),
            email: EmailAddress::from_stored(row.email),
            email_update: row.email_update.map(EmailAddress::from_stored),
            password: PasswordHash::from_stored(row.password),
            activation_code: row.activation_code.map(ActivationCode::from_stored),
        })
    }
}

/// Insertable account record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub avatar: Option<&'a str>,
    pub email: &'a str,
    pub email_update: Option<&'a str>,
    pub password: &'a str,
    pub activation_code: Option<&'a str>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            name: user.name().as_str(),
            avatar: user.avatar().map(Avatar::as_str),
            email: user.email().as_str(),
            email_update: user.email_update().map(EmailAddress::as_str),
            password: user.password().as_phc(),
            activation_code: user.activation_code().map(ActivationCode::as_str),
        }
    }
}

/// Mutable columns written by an update. `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub avatar: Option<&'a str>,
    pub email_update: Option<&'a str>,
    pub password: &'a str,
    pub activation_code: Option<&'a str>,
}

impl<'a> From<&'a User> for UserChangeset<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: user.name().as_str(),
            avatar: user.avatar().map(Avatar::as_str),
            email_update: user.email_update().map(EmailAddress::as_str),
            password: user.password().as_phc(),
            activation_code: user.activation_code().map(ActivationCode::as_str),
        }
    }
}
