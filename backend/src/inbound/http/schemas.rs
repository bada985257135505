//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "validation_failed")]
    ValidationFailed,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A backing service is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "validation_failed")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "name must not be empty")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "6f1c7e2a-5d0b-4c55-9a4e-1b2f3c4d5e6f")]
    trace_id: Option<String>,
    /// Field and reason code for validation failures.
    #[schema(value_type = Option<Object>)]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::UserView`].
///
/// Public projection of an account; credentials never appear here.
#[derive(ToSchema)]
#[schema(as = crate::domain::UserView)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserViewSchema {
    /// Stable user identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    name: String,
    /// Avatar reference, when set.
    #[schema(example = "/avatars/ada.png")]
    avatar: Option<String>,
    /// Confirmed email address.
    #[schema(example = "ada@example.org")]
    email: String,
    /// Address awaiting confirmation, when a change is pending.
    #[schema(example = "countess@example.org")]
    email_update: Option<String>,
}

/// OpenAPI schema for [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = pagination::PageMeta)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetaSchema {
    /// One-based page number.
    #[schema(example = 1)]
    current_page: u32,
    /// Page size.
    #[schema(example = 15)]
    per_page: u32,
    /// Total number of users.
    #[schema(example = 42)]
    total: u64,
    /// Last page number; at least 1.
    #[schema(example = 3)]
    last_page: u64,
    /// One-based index of the first item on this page.
    from: Option<u64>,
    /// One-based index of the last item on this page.
    to: Option<u64>,
}

/// OpenAPI schema for [`pagination::PageLinks`].
#[derive(ToSchema)]
#[schema(as = pagination::PageLinks)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageLinksSchema {
    /// Link to the first page.
    first: String,
    /// Link to the last page.
    last: String,
    /// Link to the previous page, absent on the first page.
    prev: Option<String>,
    /// Link to the next page, absent on the last page.
    next: Option<String>,
}

/// OpenAPI schema for a page of users.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPageSchema {
    /// Users on this page, in store order.
    data: Vec<UserViewSchema>,
    /// Paging metadata.
    meta: PageMetaSchema,
    /// Navigation links.
    links: PageLinksSchema,
}
