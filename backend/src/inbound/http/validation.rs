//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every client input failure, whether raised by a domain constructor or by
//! an Actix extractor, becomes a `validation_failed` error whose details name
//! the offending field and a stable reason code.

use actix_web::{HttpRequest, error as actix_error, web};
use serde_json::json;

use crate::domain::{Error, PasswordValidationError, UserId, UserValidationError};

/// Reason codes for failures detected by the HTTP adapter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidBody,
    InvalidNumber,
    InvalidPath,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidBody => "invalid_body",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidPath => "invalid_path",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const ID_FIELD: FieldName = FieldName::new("id");
pub(crate) const BODY_FIELD: FieldName = FieldName::new("body");
pub(crate) const PAGE_FIELD: FieldName = FieldName::new("page");
pub(crate) const PASSWORD_FIELD: FieldName = FieldName::new("password");

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::validation_failed(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn adapter_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    field_error(field.as_str(), code.as_str(), message)
}

/// Map a value-object failure onto the field it came from.
pub(crate) fn user_field_error(err: UserValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn password_field_error(err: PasswordValidationError) -> Error {
    field_error(PASSWORD_FIELD.as_str(), err.code(), err.to_string())
}

/// Parse a path segment into a [`UserId`].
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| {
        adapter_error(ID_FIELD, ErrorCode::InvalidUuid, "user id must be a valid UUID")
    })
}

/// JSON body extractor settings rejecting malformed payloads with 422.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: actix_error::JsonPayloadError, _req: &HttpRequest| {
        adapter_error(
            BODY_FIELD,
            ErrorCode::InvalidBody,
            format!("request body is invalid: {err}"),
        )
        .into()
    })
}

/// Query extractor settings; the only query parameter is `page`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: actix_error::QueryPayloadError, _req: &HttpRequest| {
        adapter_error(
            PAGE_FIELD,
            ErrorCode::InvalidNumber,
            format!("page must be a positive integer: {err}"),
        )
        .into()
    })
}

/// Path extractor settings rejecting undecodable segments with 422.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: actix_error::PathError, _req: &HttpRequest| {
        adapter_error(
            ID_FIELD,
            ErrorCode::InvalidPath,
            format!("path is invalid: {err}"),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, PlainPassword, UserName};
    use rstest::rstest;

    fn details(error: &Error) -> (String, String) {
        let details = error.details().expect("details present");
        let read = |key: &str| {
            details
                .get(key)
                .and_then(serde_json::Value::as_str)
                .expect("string detail")
                .to_owned()
        };
        (read("field"), read("code"))
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    #[case("3fa85f64-5717-4562-b3fc")]
    fn malformed_ids_name_the_id_field(#[case] raw: &str) {
        let error = parse_user_id(raw).expect_err("invalid id");
        assert_eq!(error.code(), DomainCode::ValidationFailed);
        assert_eq!(
            details(&error),
            ("id".to_owned(), "invalid_uuid".to_owned())
        );
    }

    #[rstest]
    fn canonical_ids_parse() {
        let id = parse_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn user_errors_keep_field_and_code() {
        let err = UserName::new("   ").expect_err("blank name");
        let error = user_field_error(err);
        assert_eq!(details(&error), ("name".to_owned(), "empty".to_owned()));
        assert_eq!(error.message(), "name must not be empty");
    }

    #[rstest]
    fn password_errors_name_the_password_field() {
        let err = PlainPassword::new("short").expect_err("too short");
        let error = password_field_error(err);
        assert_eq!(
            details(&error),
            ("password".to_owned(), "too_short".to_owned())
        );
    }
}
